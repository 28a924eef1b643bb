//! JSON log lines: one JSON object per line (ndjson) for ingestion and audit.

use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Per-stage progress line for the run log
#[derive(Debug, Serialize)]
pub struct StageEvent<'a> {
    pub stage: &'a str,
    pub rows: usize,
    pub columns: usize,
    pub elapsed_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resident_bytes: Option<u64>,
}

impl StageEvent<'_> {
    pub fn log(&self) {
        tracing::info!(
            stage = self.stage,
            rows = self.rows,
            columns = self.columns,
            elapsed_ms = self.elapsed_ms as u64,
            resident_bytes = self.resident_bytes,
            "stage complete"
        );
    }
}

/// Initialize tracing with JSON format (one JSON object per line)
pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber: stderr, level from RUST_LOG or default. Stdout is left
    /// for the run report line.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            let _ = tracing_subscriber::registry().with(filter).with(fmt).try_init();
        } else {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init();
        }
    }

    /// Emit a single structured line (e.g. the run report) without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) {
        if let Ok(line) = serde_json::to_string(event) {
            let _ = writeln!(w, "{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_json_writes_one_line() {
        let ev = StageEvent {
            stage: "scrub",
            rows: 10,
            columns: 87,
            elapsed_ms: 3,
            resident_bytes: None,
        };
        let mut buf = Vec::new();
        StructuredLogger::emit_json(&ev, &mut buf);
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(
            line,
            "{\"stage\":\"scrub\",\"rows\":10,\"columns\":87,\"elapsed_ms\":3}\n"
        );
    }
}
