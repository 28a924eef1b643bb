//! Row and column cleaning: sentinel scrubbing and column pruning.

mod prune;
mod scrub;

pub use prune::ColumnPruner;
pub use scrub::{ScrubReport, SentinelScrubber};
