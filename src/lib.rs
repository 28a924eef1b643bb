//! flowprep — flow-record normalization pipeline.
//!
//! Modular structure:
//! - [`ingest`] — Source discovery, CSV parsing and multi-file merge
//! - [`normalize`] — Numeric range analysis and safe narrowing
//! - [`clean`] — Sentinel row scrubbing and column pruning
//! - [`export`] — Cleaned CSV and schema descriptor output
//! - [`pipeline`] — Stage driver and run report
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod table;
pub mod ingest;
pub mod normalize;
pub mod clean;
pub mod export;
pub mod pipeline;
pub mod logging;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use table::{Column, ColumnData, StorageType, Table};
pub use ingest::SourceLoader;
pub use normalize::{RangeAnalyzer, RangeReport, TypeNormalizer};
pub use clean::{ColumnPruner, SentinelScrubber};
pub use export::{Exporter, SchemaDescriptor};
pub use pipeline::{Pipeline, RunReport};
pub use logging::StructuredLogger;
