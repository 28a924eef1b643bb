//! Pipeline error kinds. Every variant aborts the run; nothing is retried or swallowed.

use crate::table::StorageType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("schema mismatch in {path}: missing columns {missing:?}, unexpected columns {unexpected:?}")]
    SchemaMismatch {
        path: PathBuf,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("refusing to narrow column '{column}' from {from} to {to}: values do not fit")]
    PrecisionLoss {
        column: String,
        from: StorageType,
        to: StorageType,
    },

    #[error("missing values remain after sentinel removal: {}", format_counts(.columns))]
    ResidualMissingValue { columns: Vec<(String, usize)> },

    #[error("column '{column}' not present in table")]
    MissingColumn { column: String },

    #[error("no source files found")]
    NoSources,

    #[error("{path}: row {row} has {found} fields, expected {expected}")]
    Parse {
        path: PathBuf,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not restore {path} after failed export ({cause}): {source}")]
    Rollback {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        cause: Box<PipelineError>,
    },
}

fn format_counts(columns: &[(String, usize)]) -> String {
    columns
        .iter()
        .map(|(name, n)| format!("{name}={n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
