//! In-memory columnar table holding the merged flow records.

mod column;

pub use column::{Column, ColumnData};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical storage type names, as written to the schema descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    Int32,
    Int64,
    Float32,
    Float64,
    String,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Int32 => "int32",
            StorageType::Int64 => "int64",
            StorageType::Float32 => "float32",
            StorageType::Float64 => "float64",
            StorageType::String => "string",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, StorageType::Int32 | StorageType::Int64)
    }

    pub fn is_real(&self) -> bool {
        matches!(self, StorageType::Float32 | StorageType::Float64)
    }

    /// The narrow counterpart of a numeric type; `None` for text.
    pub fn narrowed(&self) -> Option<StorageType> {
        match self {
            StorageType::Int32 | StorageType::Int64 => Some(StorageType::Int32),
            StorageType::Float32 | StorageType::Float64 => Some(StorageType::Float32),
            StorageType::String => None,
        }
    }

    /// Smallest type both sides widen into without loss.
    pub fn unify(self, other: StorageType) -> StorageType {
        if self == other {
            self
        } else if self == StorageType::String || other == StorageType::String {
            StorageType::String
        } else if self.is_integer() && other.is_integer() {
            StorageType::Int64
        } else {
            StorageType::Float64
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of equally long columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].len() == w[1].len()),
            "columns must have equal length"
        );
        Self { columns }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Remove a column by name, preserving the order of the rest.
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.position(name)?;
        Some(self.columns.remove(idx))
    }

    /// Keep only rows whose mask entry is true, across every column.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        for col in &mut self.columns {
            col.data.retain_rows(keep);
        }
    }

    /// Append `other` below `self`. Columns are matched by name; the caller
    /// guarantees both tables carry the same column set.
    pub fn append(&mut self, other: Table) {
        if self.columns.is_empty() {
            self.columns = other.columns;
            return;
        }
        let mut incoming = other.columns;
        for col in &mut self.columns {
            if let Some(idx) = incoming.iter().position(|c| c.name == col.name) {
                let next = incoming.swap_remove(idx);
                col.data.append(next.data);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Table {
        Table::new(vec![
            Column::new("a", ColumnData::Int64(vec![Some(1), Some(2)])),
            Column::new("b", ColumnData::Text(vec![Some("x".into()), None])),
        ])
    }

    #[test]
    fn unify_rules() {
        assert_eq!(StorageType::Int64.unify(StorageType::Float64), StorageType::Float64);
        assert_eq!(StorageType::Int32.unify(StorageType::Int64), StorageType::Int64);
        assert_eq!(StorageType::Float64.unify(StorageType::String), StorageType::String);
    }

    #[test]
    fn append_matches_by_name() {
        let mut t = small();
        let other = Table::new(vec![
            Column::new("b", ColumnData::Text(vec![Some("y".into())])),
            Column::new("a", ColumnData::Int64(vec![Some(3)])),
        ]);
        t.append(other);
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.column_names(), vec!["a", "b"]);
        assert_eq!(
            t.column("a").unwrap().data,
            ColumnData::Int64(vec![Some(1), Some(2), Some(3)])
        );
    }

    #[test]
    fn drop_column_keeps_order() {
        let mut t = Table::new(vec![
            Column::new("a", ColumnData::Int64(vec![Some(1)])),
            Column::new("b", ColumnData::Int64(vec![Some(2)])),
            Column::new("c", ColumnData::Int64(vec![Some(3)])),
        ]);
        assert!(t.drop_column("b").is_some());
        assert!(t.drop_column("b").is_none());
        assert_eq!(t.column_names(), vec!["a", "c"]);
    }

    #[test]
    fn retain_rows_applies_to_all_columns() {
        let mut t = small();
        t.retain_rows(&[false, true]);
        assert_eq!(t.n_rows(), 1);
        assert_eq!(t.column("b").unwrap().data, ColumnData::Text(vec![None]));
    }

    #[test]
    fn storage_type_serializes_canonical_name() {
        assert_eq!(serde_json::to_string(&StorageType::Float32).unwrap(), "\"float32\"");
        assert_eq!(StorageType::Int64.to_string(), "int64");
    }
}
