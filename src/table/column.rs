//! Typed column storage. Missing cells are `None`; a `NaN` in a real column also counts as missing.

use super::StorageType;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int64(Vec<Option<i64>>),
    Int32(Vec<Option<i32>>),
    Float64(Vec<Option<f64>>),
    Float32(Vec<Option<f32>>),
    Text(Vec<Option<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    pub fn storage_type(&self) -> StorageType {
        self.data.storage_type()
    }
}

fn retain_by_mask<T>(values: &mut Vec<T>, keep: &[bool]) {
    let mut idx = 0;
    values.retain(|_| {
        let k = keep[idx];
        idx += 1;
        k
    });
}

fn cells_to_text<T: ToString>(v: Vec<Option<T>>) -> Vec<Option<String>> {
    v.into_iter().map(|c| c.map(|x| x.to_string())).collect()
}

impl ColumnData {
    /// Empty storage of the given type with room for `capacity` cells.
    pub fn with_capacity(ty: StorageType, capacity: usize) -> Self {
        match ty {
            StorageType::Int64 => ColumnData::Int64(Vec::with_capacity(capacity)),
            StorageType::Int32 => ColumnData::Int32(Vec::with_capacity(capacity)),
            StorageType::Float64 => ColumnData::Float64(Vec::with_capacity(capacity)),
            StorageType::Float32 => ColumnData::Float32(Vec::with_capacity(capacity)),
            StorageType::String => ColumnData::Text(Vec::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.len(),
            ColumnData::Int32(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Float32(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            ColumnData::Int64(_) => StorageType::Int64,
            ColumnData::Int32(_) => StorageType::Int32,
            ColumnData::Float64(_) => StorageType::Float64,
            ColumnData::Float32(_) => StorageType::Float32,
            ColumnData::Text(_) => StorageType::String,
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Int32(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Float64(v) => v.iter().filter(|c| c.map_or(true, f64::is_nan)).count(),
            ColumnData::Float32(v) => v.iter().filter(|c| c.map_or(true, f32::is_nan)).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// True when the cell at `row` holds positive or negative infinity.
    pub fn is_infinite_at(&self, row: usize) -> bool {
        match self {
            ColumnData::Float64(v) => matches!(v[row], Some(x) if x.is_infinite()),
            ColumnData::Float32(v) => matches!(v[row], Some(x) if x.is_infinite()),
            _ => false,
        }
    }

    /// CSV rendering of one cell; missing cells render empty.
    pub fn format_cell(&self, row: usize) -> String {
        match self {
            ColumnData::Int64(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
            ColumnData::Int32(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
            ColumnData::Float64(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
            ColumnData::Float32(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
            ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
        }
    }

    /// Keep only rows whose mask entry is true. `keep.len()` must equal `self.len()`.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.len());
        match self {
            ColumnData::Int64(v) => retain_by_mask(v, keep),
            ColumnData::Int32(v) => retain_by_mask(v, keep),
            ColumnData::Float64(v) => retain_by_mask(v, keep),
            ColumnData::Float32(v) => retain_by_mask(v, keep),
            ColumnData::Text(v) => retain_by_mask(v, keep),
        }
    }

    /// Lossless widening used when merging sources whose inferred types differ.
    /// Narrowing requests return the data unchanged; narrowing belongs to the normalizer.
    pub fn widen(self, target: StorageType) -> ColumnData {
        match (self, target) {
            (data, t) if data.storage_type() == t => data,
            (ColumnData::Int32(v), StorageType::Int64) => {
                ColumnData::Int64(v.into_iter().map(|c| c.map(i64::from)).collect())
            }
            (ColumnData::Int32(v), StorageType::Float64) => {
                ColumnData::Float64(v.into_iter().map(|c| c.map(f64::from)).collect())
            }
            (ColumnData::Int64(v), StorageType::Float64) => {
                ColumnData::Float64(v.into_iter().map(|c| c.map(|x| x as f64)).collect())
            }
            (ColumnData::Float32(v), StorageType::Float64) => {
                ColumnData::Float64(v.into_iter().map(|c| c.map(f64::from)).collect())
            }
            (ColumnData::Int64(v), StorageType::String) => ColumnData::Text(cells_to_text(v)),
            (ColumnData::Int32(v), StorageType::String) => ColumnData::Text(cells_to_text(v)),
            (ColumnData::Float64(v), StorageType::String) => ColumnData::Text(cells_to_text(v)),
            (ColumnData::Float32(v), StorageType::String) => ColumnData::Text(cells_to_text(v)),
            (data, _) => data,
        }
    }

    /// Append `other` below `self`, promoting both to their common type first.
    pub fn append(&mut self, other: ColumnData) {
        let target = self.storage_type().unify(other.storage_type());
        let current = std::mem::replace(self, ColumnData::Int64(Vec::new()));
        let mut merged = current.widen(target);
        match (&mut merged, other.widen(target)) {
            (ColumnData::Int64(a), ColumnData::Int64(b)) => a.extend(b),
            (ColumnData::Int32(a), ColumnData::Int32(b)) => a.extend(b),
            (ColumnData::Float64(a), ColumnData::Float64(b)) => a.extend(b),
            (ColumnData::Float32(a), ColumnData::Float32(b)) => a.extend(b),
            (ColumnData::Text(a), ColumnData::Text(b)) => a.extend(b),
            _ => unreachable!("both sides widened to {target}"),
        }
        *self = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_counts_nan_as_missing() {
        let d = ColumnData::Float64(vec![Some(1.0), None, Some(f64::NAN), Some(f64::INFINITY)]);
        assert_eq!(d.missing_count(), 2);
        assert!(d.is_infinite_at(3));
        assert!(!d.is_infinite_at(0));
    }

    #[test]
    fn append_promotes_int_to_float() {
        let mut a = ColumnData::Int64(vec![Some(1), None]);
        a.append(ColumnData::Float64(vec![Some(2.5)]));
        assert_eq!(a, ColumnData::Float64(vec![Some(1.0), None, Some(2.5)]));
    }

    #[test]
    fn append_promotes_to_text() {
        let mut a = ColumnData::Text(vec![Some("BENIGN".into())]);
        a.append(ColumnData::Int64(vec![Some(7)]));
        assert_eq!(a, ColumnData::Text(vec![Some("BENIGN".into()), Some("7".into())]));
    }

    #[test]
    fn retain_rows_follows_mask() {
        let mut d = ColumnData::Int32(vec![Some(1), Some(2), Some(3)]);
        d.retain_rows(&[true, false, true]);
        assert_eq!(d, ColumnData::Int32(vec![Some(1), Some(3)]));
    }

    #[test]
    fn format_cell_renders_missing_empty() {
        let d = ColumnData::Float32(vec![Some(0.5), None]);
        assert_eq!(d.format_cell(0), "0.5");
        assert_eq!(d.format_cell(1), "");
    }
}
