//! Sentinel removal: drop every row holding an infinity, then prove no missing values remain.

use crate::error::{PipelineError, Result};
use crate::table::Table;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrubReport {
    pub rows_before: usize,
    pub rows_removed: usize,
    /// Infinite cells per column, counted before removal
    pub sentinel_cells: Vec<(String, usize)>,
}

pub struct SentinelScrubber;

impl SentinelScrubber {
    /// Row mask: false where any column holds an infinity.
    pub fn sentinel_mask(table: &Table) -> Vec<bool> {
        let mut keep = vec![true; table.n_rows()];
        for column in table.columns() {
            for (row, k) in keep.iter_mut().enumerate() {
                if *k && column.data.is_infinite_at(row) {
                    *k = false;
                }
            }
        }
        keep
    }

    /// Remove sentinel rows as one set and verify that no missing values survive.
    pub fn scrub(mut table: Table) -> Result<(Table, ScrubReport)> {
        let rows_before = table.n_rows();
        let sentinel_cells: Vec<(String, usize)> = table
            .columns()
            .iter()
            .map(|c| {
                let hits = (0..c.len()).filter(|&r| c.data.is_infinite_at(r)).count();
                (c.name.clone(), hits)
            })
            .filter(|(_, hits)| *hits > 0)
            .collect();

        let keep = Self::sentinel_mask(&table);
        let rows_removed = keep.iter().filter(|k| !**k).count();
        if rows_removed > 0 {
            table.retain_rows(&keep);
        }

        Self::verify_complete(&table)?;

        info!(rows_before, rows_removed, rows_after = table.n_rows(), "sentinel rows removed");
        Ok((
            table,
            ScrubReport {
                rows_before,
                rows_removed,
                sentinel_cells,
            },
        ))
    }

    /// Postcondition: every column is free of missing values.
    pub fn verify_complete(table: &Table) -> Result<()> {
        let residual: Vec<(String, usize)> = table
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.data.missing_count()))
            .filter(|(_, n)| *n > 0)
            .collect();
        if residual.is_empty() {
            return Ok(());
        }
        warn!(columns = residual.len(), "missing values not explained by sentinel rows");
        Err(PipelineError::ResidualMissingValue { columns: residual })
    }
}
