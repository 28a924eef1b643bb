//! Per-column range analysis: can every value be stored in the narrow type?

use crate::table::{Column, ColumnData, StorageType, Table};
use serde::Serialize;

/// Observed extent of a numeric column. Real extents cover finite values only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extent {
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Real {
        min: Option<f64>,
        max: Option<f64>,
        non_finite: usize,
    },
}

impl Extent {
    fn fits_narrow(&self) -> bool {
        match *self {
            Extent::Integer { min, max } => {
                min.map_or(true, |v| v >= i64::from(i32::MIN))
                    && max.map_or(true, |v| v <= i64::from(i32::MAX))
            }
            Extent::Real { min, max, .. } => {
                let limit = f64::from(f32::MAX);
                min.map_or(true, |v| v >= -limit) && max.map_or(true, |v| v <= limit)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnVerdict {
    pub column: String,
    pub current: StorageType,
    pub extent: Extent,
    pub narrowable: bool,
}

/// Verdicts for every numeric column, in table order. Text columns have no entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RangeReport {
    pub verdicts: Vec<ColumnVerdict>,
}

impl RangeReport {
    pub fn verdict(&self, column: &str) -> Option<&ColumnVerdict> {
        self.verdicts.iter().find(|v| v.column == column)
    }

    /// Columns that must keep their wide storage.
    pub fn wide_columns(&self) -> Vec<String> {
        self.verdicts
            .iter()
            .filter(|v| !v.narrowable)
            .map(|v| v.column.clone())
            .collect()
    }

    /// Columns with at least one infinite cell, with the count.
    pub fn sentinel_counts(&self) -> Vec<(String, usize)> {
        self.verdicts
            .iter()
            .filter_map(|v| match v.extent {
                Extent::Real { non_finite, .. } if non_finite > 0 => {
                    Some((v.column.clone(), non_finite))
                }
                _ => None,
            })
            .collect()
    }
}

fn int_extent<T: Copy + Into<i64>>(values: &[Option<T>]) -> Extent {
    let mut min: Option<i64> = None;
    let mut max: Option<i64> = None;
    for v in values.iter().flatten() {
        let v: i64 = (*v).into();
        min = Some(min.map_or(v, |m| m.min(v)));
        max = Some(max.map_or(v, |m| m.max(v)));
    }
    Extent::Integer { min, max }
}

fn real_extent<T: Copy + Into<f64>>(values: &[Option<T>]) -> Extent {
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    let mut non_finite = 0;
    for v in values.iter().flatten() {
        let v: f64 = (*v).into();
        if v.is_infinite() {
            non_finite += 1;
            continue;
        }
        if v.is_nan() {
            continue;
        }
        min = Some(min.map_or(v, |m| m.min(v)));
        max = Some(max.map_or(v, |m| m.max(v)));
    }
    Extent::Real {
        min,
        max,
        non_finite,
    }
}

pub struct RangeAnalyzer;

impl RangeAnalyzer {
    /// Scan every value of every numeric column. One out-of-range value anywhere
    /// disqualifies the whole column.
    pub fn analyze(table: &Table) -> RangeReport {
        RangeReport {
            verdicts: table.columns().iter().filter_map(Self::analyze_column).collect(),
        }
    }

    pub fn analyze_column(column: &Column) -> Option<ColumnVerdict> {
        let extent = match &column.data {
            ColumnData::Int64(v) => int_extent(v),
            ColumnData::Int32(v) => int_extent(v),
            ColumnData::Float64(v) => real_extent(v),
            ColumnData::Float32(v) => real_extent(v),
            ColumnData::Text(_) => return None,
        };
        Some(ColumnVerdict {
            column: column.name.clone(),
            current: column.storage_type(),
            narrowable: extent.fits_narrow(),
            extent,
        })
    }
}
