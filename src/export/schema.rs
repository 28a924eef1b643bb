//! Schema descriptor: ordered column name to storage type mapping, persisted as JSON.

use crate::error::Result;
use crate::table::{StorageType, Table};
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    entries: Vec<(String, StorageType)>,
}

impl SchemaDescriptor {
    /// Snapshot of the table's current column order and storage types.
    pub fn from_table(table: &Table) -> Self {
        Self {
            entries: table
                .columns()
                .iter()
                .map(|c| (c.name.clone(), c.storage_type()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, StorageType)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<StorageType> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, ty)| *ty)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a descriptor written by [`SchemaDescriptor::to_json_pretty`], keeping key order.
    pub fn from_json(raw: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)?;
        let mut entries = Vec::with_capacity(map.len());
        for (name, value) in map {
            entries.push((name, serde_json::from_value::<StorageType>(value)?));
        }
        Ok(Self { entries })
    }
}

impl Serialize for SchemaDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, ty) in &self.entries {
            map.serialize_entry(name, ty)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData};

    #[test]
    fn json_keeps_column_order() {
        let table = Table::new(vec![
            Column::new("Flow Duration", ColumnData::Int64(vec![Some(1)])),
            Column::new("Flow Bytes/s", ColumnData::Float32(vec![Some(0.5)])),
            Column::new("Destination Port", ColumnData::Int32(vec![Some(80)])),
            Column::new("Label", ColumnData::Text(vec![Some("BENIGN".into())])),
        ]);
        let schema = SchemaDescriptor::from_table(&table);
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(
            json,
            r#"{"Flow Duration":"int64","Flow Bytes/s":"float32","Destination Port":"int32","Label":"string"}"#
        );
        let back = SchemaDescriptor::from_json(&schema.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, schema);
        assert_eq!(back.get("Destination Port"), Some(StorageType::Int32));
    }

    #[test]
    fn unknown_type_name_is_rejected() {
        assert!(SchemaDescriptor::from_json(r#"{"a":"uint8"}"#).is_err());
    }
}
