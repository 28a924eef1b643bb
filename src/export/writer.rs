//! CSV + schema export. Both files are staged next to their targets and only
//! persisted once both are fully written.

use super::SchemaDescriptor;
use crate::config::OutputConfig;
use crate::error::{PipelineError, Result};
use crate::table::Table;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub table_path: PathBuf,
    pub schema_path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub table_sha256: String,
}

/// Forwards writes and hashes every byte that reached the inner writer.
struct HashingWriter<W: Write> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn target_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn staging_file(target: &Path) -> Result<NamedTempFile> {
    let dir = target_dir(target);
    std::fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;
    NamedTempFile::new_in(&dir).map_err(|e| PipelineError::io(&dir, e))
}

/// Previous output moved aside before persisting, so a failed export can put it back.
/// Dropping it after a successful export deletes the saved copy.
struct Backup {
    target: PathBuf,
    saved: Option<TempPath>,
}

impl Backup {
    fn take(target: &Path) -> Result<Self> {
        if target.is_dir() {
            return Err(PipelineError::io(
                target,
                std::io::Error::new(std::io::ErrorKind::Other, "output path is a directory"),
            ));
        }
        if !target.exists() {
            return Ok(Self {
                target: target.to_path_buf(),
                saved: None,
            });
        }
        let dir = target_dir(target);
        let saved = NamedTempFile::new_in(&dir)
            .map_err(|e| PipelineError::io(&dir, e))?
            .into_temp_path();
        std::fs::rename(target, &saved).map_err(|e| PipelineError::io(target, e))?;
        Ok(Self {
            target: target.to_path_buf(),
            saved: Some(saved),
        })
    }

    /// Put the previous file back, or remove whatever this run left when there was none.
    fn restore(self) -> std::io::Result<()> {
        match self.saved {
            Some(saved) => {
                let path = saved.keep().map_err(|e| e.error)?;
                std::fs::rename(path, &self.target)
            }
            None => match std::fs::remove_file(&self.target) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
        }
    }
}

/// Undo a partial export. A failed restore is reported alongside the original cause.
fn roll_back(cause: PipelineError, backups: Vec<Backup>) -> PipelineError {
    warn!(error = %cause, "export failed, restoring previous outputs");
    for backup in backups {
        let path = backup.target.clone();
        if let Err(source) = backup.restore() {
            return PipelineError::Rollback {
                path,
                source,
                cause: Box::new(cause),
            };
        }
    }
    cause
}

/// Header row then one record per row, columns in table order. Returns the SHA-256 of the bytes written.
fn write_table<W: Write>(table: &Table, out: W, path: &Path) -> Result<String> {
    let sink = HashingWriter {
        inner: BufWriter::new(out),
        hasher: Sha256::new(),
    };
    let mut wtr = csv::Writer::from_writer(sink);
    wtr.write_record(table.column_names())
        .map_err(|e| PipelineError::csv(path, e))?;
    for row in 0..table.n_rows() {
        wtr.write_record(table.columns().iter().map(|c| c.data.format_cell(row)))
            .map_err(|e| PipelineError::csv(path, e))?;
    }
    let mut sink = wtr
        .into_inner()
        .map_err(|e| PipelineError::io(path, e.into_error()))?;
    sink.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(format!("{:x}", sink.hasher.finalize()))
}

pub struct Exporter {
    table_path: PathBuf,
    schema_path: PathBuf,
}

impl Exporter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            table_path: config.table_path.clone(),
            schema_path: config.schema_path.clone(),
        }
    }

    /// Write the table as CSV and its schema descriptor as JSON. Either both land
    /// at their targets or the previous outputs are left in place.
    pub fn export(&self, table: &Table) -> Result<ExportSummary> {
        let schema = SchemaDescriptor::from_table(table);

        let mut table_tmp = staging_file(&self.table_path)?;
        let digest = write_table(table, table_tmp.as_file_mut(), &self.table_path)?;

        let mut schema_tmp = staging_file(&self.schema_path)?;
        let json = schema.to_json_pretty()?;
        schema_tmp
            .write_all(json.as_bytes())
            .and_then(|_| schema_tmp.flush())
            .map_err(|e| PipelineError::io(&self.schema_path, e))?;

        let table_backup = Backup::take(&self.table_path)?;
        let schema_backup = match Backup::take(&self.schema_path) {
            Ok(b) => b,
            Err(e) => return Err(roll_back(e, vec![table_backup])),
        };
        let persisted = table_tmp
            .persist(&self.table_path)
            .map_err(|e| PipelineError::io(&self.table_path, e.error))
            .and_then(|_| {
                schema_tmp
                    .persist(&self.schema_path)
                    .map_err(|e| PipelineError::io(&self.schema_path, e.error))
            });
        if let Err(e) = persisted {
            return Err(roll_back(e, vec![table_backup, schema_backup]));
        }

        info!(
            table = %self.table_path.display(),
            schema = %self.schema_path.display(),
            rows = table.n_rows(),
            columns = schema.len(),
            "export complete"
        );
        Ok(ExportSummary {
            table_path: self.table_path.clone(),
            schema_path: self.schema_path.clone(),
            rows: table.n_rows(),
            columns: schema.len(),
            table_sha256: digest,
        })
    }
}
