//! Pipeline driver: load → analyze → normalize → scrub → prune → export.
//! The table is owned by a single run and moved from stage to stage.

use crate::clean::{ColumnPruner, SentinelScrubber};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::export::{ExportSummary, Exporter};
use crate::ingest::{SourceFile, SourceLoader};
use crate::logging::{resident_bytes, StageEvent};
use crate::normalize::{RangeAnalyzer, TypeNormalizer};
use crate::table::Table;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources: Vec<SourceFile>,
    pub rows_loaded: usize,
    pub rows_removed: usize,
    pub rows_exported: usize,
    pub columns_loaded: usize,
    pub columns_exported: usize,
    pub narrowed_columns: Vec<String>,
    pub wide_columns: Vec<String>,
    pub sentinel_cells: Vec<(String, usize)>,
    pub dropped_columns: Vec<String>,
    pub export: ExportSummary,
}

impl RunReport {
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| PipelineError::io(path, e))
    }
}

fn stage_done(stage: &str, table: &Table, started: Instant) {
    StageEvent {
        stage,
        rows: table.n_rows(),
        columns: table.n_cols(),
        elapsed_ms: started.elapsed().as_millis(),
        resident_bytes: resident_bytes(),
    }
    .log();
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Discover sources from the input config and run every stage.
    pub fn run(&self) -> Result<RunReport> {
        let sources = SourceLoader::discover(&self.config.input)?;
        self.run_sources(&sources)
    }

    pub fn run_sources(&self, sources: &[PathBuf]) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, sources = sources.len(), "pipeline run starting");

        let t = Instant::now();
        let loaded = SourceLoader::load(sources)?;
        let table = loaded.table;
        let rows_loaded = table.n_rows();
        let columns_loaded = table.n_cols();
        stage_done("load", &table, t);

        let t = Instant::now();
        let ranges = RangeAnalyzer::analyze(&table);
        let wide_columns = ranges.wide_columns();
        let narrowed_columns: Vec<String> = ranges
            .verdicts
            .iter()
            .filter(|v| v.narrowable && v.current.narrowed() != Some(v.current))
            .map(|v| v.column.clone())
            .collect();
        if !wide_columns.is_empty() {
            info!(columns = ?wide_columns, "columns kept at wide width");
        }
        let table = TypeNormalizer::new(&ranges).apply(table)?;
        stage_done("normalize", &table, t);

        let t = Instant::now();
        let (table, scrub) = SentinelScrubber::scrub(table)?;
        stage_done("scrub", &table, t);

        let t = Instant::now();
        let pruner = ColumnPruner::new(self.config.prune.columns.clone());
        let table = pruner.prune(table)?;
        stage_done("prune", &table, t);

        let t = Instant::now();
        let export = Exporter::new(&self.config.output).export(&table)?;
        stage_done("export", &table, t);

        let rows_exported = table.n_rows();
        let columns_exported = table.n_cols();
        drop(table);
        debug!("table released");

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            sources: loaded.files,
            rows_loaded,
            rows_removed: scrub.rows_removed,
            rows_exported,
            columns_loaded,
            columns_exported,
            narrowed_columns,
            wide_columns,
            sentinel_cells: scrub.sentinel_cells,
            dropped_columns: pruner.columns().to_vec(),
            export,
        };
        // Outputs are already persisted; a lost report does not fail the run.
        if let Some(path) = &self.config.output.report_path {
            if let Err(e) = report.write(path) {
                warn!(path = %path.display(), error = %e, "run report not written");
            }
        }
        info!(%run_id, rows_exported, columns_exported, "pipeline run complete");
        Ok(report)
    }
}
