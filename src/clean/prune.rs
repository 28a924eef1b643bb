//! Removal of identity and deprecated-flag columns.

use crate::error::{PipelineError, Result};
use crate::table::Table;
use tracing::info;

pub struct ColumnPruner {
    columns: Vec<String>,
}

impl ColumnPruner {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Drop every configured column. All of them must be present; the table is
    /// left untouched if any is missing.
    pub fn prune(&self, mut table: Table) -> Result<Table> {
        if let Some(absent) = self.columns.iter().find(|c| table.position(c).is_none()) {
            return Err(PipelineError::MissingColumn {
                column: absent.clone(),
            });
        }
        for name in &self.columns {
            table.drop_column(name);
        }
        info!(dropped = self.columns.len(), remaining = table.n_cols(), "columns pruned");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PRUNE_COLUMNS;
    use crate::table::{Column, ColumnData};

    fn with_identity() -> Table {
        let mut cols: Vec<Column> = DEFAULT_PRUNE_COLUMNS
            .iter()
            .map(|n| Column::new(*n, ColumnData::Int64(vec![Some(0)])))
            .collect();
        cols.insert(2, Column::new("Destination Port", ColumnData::Int64(vec![Some(443)])));
        cols.push(Column::new("Label", ColumnData::Text(vec![Some("BENIGN".into())])));
        Table::new(cols)
    }

    fn pruner() -> ColumnPruner {
        ColumnPruner::new(DEFAULT_PRUNE_COLUMNS.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn drops_fixed_set_and_keeps_order() {
        let out = pruner().prune(with_identity()).unwrap();
        assert_eq!(out.column_names(), vec!["Destination Port", "Label"]);
    }

    #[test]
    fn missing_column_is_reported() {
        let mut table = with_identity();
        table.drop_column("Timestamp");
        match pruner().prune(table) {
            Err(PipelineError::MissingColumn { column }) => assert_eq!(column, "Timestamp"),
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("prune should fail"),
        }
    }
}
