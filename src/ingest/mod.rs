//! Source loading: discover daily flow files and fold them into one table.

mod parse;

use crate::config::InputConfig;
use crate::error::{PipelineError, Result};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Provenance of one merged source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Merged table plus the files it came from, in merge order.
#[derive(Debug)]
pub struct LoadedSources {
    pub table: Table,
    pub files: Vec<SourceFile>,
}

pub struct SourceLoader;

impl SourceLoader {
    /// Ordered source list: explicit `files` if given, else files in `dir` with the
    /// configured extension, sorted by file name.
    pub fn discover(config: &InputConfig) -> Result<Vec<PathBuf>> {
        if !config.files.is_empty() {
            return Ok(config.files.clone());
        }
        let mut out = Vec::new();
        for entry in WalkDir::new(&config.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| PipelineError::io(&config.dir, e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| e.eq_ignore_ascii_case(&config.extension));
            if matches {
                out.push(entry.into_path());
            }
        }
        if out.is_empty() {
            return Err(PipelineError::NoSources);
        }
        Ok(out)
    }

    /// Read one CSV file into a table. Non-UTF-8 bytes are replaced, not rejected.
    pub fn read_file(path: &Path) -> Result<Table> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| PipelineError::csv(path, e))?;

        let header_bytes = rdr.byte_headers().map_err(|e| PipelineError::csv(path, e))?.clone();
        let raw_headers: Vec<String> = header_bytes
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        let headers = parse::normalize_headers(raw_headers.iter().map(String::as_str));
        let width = headers.len();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); width];
        for (idx, record) in rdr.byte_records().enumerate() {
            let record = record.map_err(|e| PipelineError::csv(path, e))?;
            if record.len() != width {
                return Err(PipelineError::Parse {
                    path: path.to_path_buf(),
                    row: idx + 1,
                    found: record.len(),
                    expected: width,
                });
            }
            for (col, field) in cells.iter_mut().zip(record.iter()) {
                col.push(String::from_utf8_lossy(field).into_owned());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| parse::build_column(name, raw))
            .collect();
        Ok(Table::new(columns))
    }

    /// Concatenate `paths` in order. Every file must carry the first file's column set;
    /// each per-file table is dropped as soon as it has been appended.
    pub fn load(paths: &[PathBuf]) -> Result<LoadedSources> {
        let Some(first) = paths.first() else {
            return Err(PipelineError::NoSources);
        };
        let mut table = Self::read_file(first)?;
        let expected: BTreeSet<String> =
            table.column_names().into_iter().map(str::to_string).collect();
        let mut files = vec![SourceFile {
            path: first.clone(),
            rows: table.n_rows(),
        }];
        debug!(path = %first.display(), rows = table.n_rows(), cols = table.n_cols(), "source read");

        for path in &paths[1..] {
            let part = Self::read_file(path)?;
            let found: BTreeSet<String> =
                part.column_names().into_iter().map(str::to_string).collect();
            if found != expected {
                return Err(PipelineError::SchemaMismatch {
                    path: path.clone(),
                    missing: expected.difference(&found).cloned().collect(),
                    unexpected: found.difference(&expected).cloned().collect(),
                });
            }
            let rows = part.n_rows();
            debug!(path = %path.display(), rows, "source read");
            table.append(part);
            files.push(SourceFile {
                path: path.clone(),
                rows,
            });
        }

        info!(
            files = files.len(),
            rows = table.n_rows(),
            cols = table.n_cols(),
            "sources merged"
        );
        Ok(LoadedSources { table, files })
    }
}
