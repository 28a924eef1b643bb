//! Pipeline configuration, loaded from JSON with defaults for every section.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identity columns and the deprecated urgent-flag triplet dropped before export.
pub const DEFAULT_PRUNE_COLUMNS: [&str; 8] = [
    "Flow ID",
    "Source IP",
    "Source Port",
    "Destination IP",
    "Timestamp",
    "Fwd URG Flags",
    "Bwd URG Flags",
    "URG Flag Count",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where the daily flow files come from
    pub input: InputConfig,
    /// Cleaned table, schema descriptor and run report destinations
    pub output: OutputConfig,
    /// Columns removed before export
    pub prune: PruneConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Explicit ordered source list; when empty, `dir` is scanned
    pub files: Vec<PathBuf>,
    /// Directory holding the daily source files
    pub dir: PathBuf,
    /// File extension picked up when scanning `dir`
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub table_path: PathBuf,
    pub schema_path: PathBuf,
    /// Optional JSON run report
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            dir: PathBuf::from("data/raw"),
            extension: "csv".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from("data/processed/flows.csv"),
            schema_path: PathBuf::from("data/processed/flows.schema.json"),
            report_path: None,
        }
    }
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_PRUNE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl PipelineConfig {
    /// Load from JSON file if present; otherwise return default.
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        serde_json::from_str(&data).map_err(|source| PipelineError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
