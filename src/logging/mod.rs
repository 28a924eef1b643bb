//! Structured logging setup and stage progress events.

mod format;
mod memory;

pub use format::{StageEvent, StructuredLogger};
pub use memory::resident_bytes;
