//! Numeric range analysis and safe downcasting of wide columns.

mod cast;
mod range;

pub use cast::TypeNormalizer;
pub use range::{ColumnVerdict, Extent, RangeAnalyzer, RangeReport};
