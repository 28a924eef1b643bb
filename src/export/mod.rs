//! Durable outputs: cleaned CSV table and its schema descriptor.

mod schema;
mod writer;

pub use schema::SchemaDescriptor;
pub use writer::{ExportSummary, Exporter};
