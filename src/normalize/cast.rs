//! Narrowing casts driven by the range report.

use super::range::RangeReport;
use crate::error::{PipelineError, Result};
use crate::table::{Column, ColumnData, Table};
use tracing::debug;

pub struct TypeNormalizer<'a> {
    report: &'a RangeReport,
}

impl<'a> TypeNormalizer<'a> {
    pub fn new(report: &'a RangeReport) -> Self {
        Self { report }
    }

    /// Narrow every column the report marks safe; pass the rest through untouched.
    pub fn apply(&self, table: Table) -> Result<Table> {
        let mut out = Vec::with_capacity(table.n_cols());
        for column in table.into_columns() {
            let narrowable = self
                .report
                .verdict(&column.name)
                .map_or(false, |v| v.narrowable);
            if narrowable {
                out.push(self.narrow(column)?);
            } else {
                out.push(column);
            }
        }
        Ok(Table::new(out))
    }

    /// Cast one numeric column to its narrow type. Already-narrow columns are returned
    /// as is. Narrowing a column without a narrowable verdict is a contract violation.
    pub fn narrow(&self, column: Column) -> Result<Column> {
        let from = column.storage_type();
        let Some(to) = from.narrowed() else {
            return Ok(column);
        };
        if from == to {
            return Ok(column);
        }
        let safe = self
            .report
            .verdict(&column.name)
            .map_or(false, |v| v.narrowable);
        if !safe {
            return Err(PipelineError::PrecisionLoss {
                column: column.name,
                from,
                to,
            });
        }

        let Column { name, data } = column;
        let lossy = |name: &str| PipelineError::PrecisionLoss {
            column: name.to_string(),
            from,
            to,
        };
        let data = match data {
            ColumnData::Int64(v) => ColumnData::Int32(
                v.into_iter()
                    .map(|c| c.map(i32::try_from).transpose())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|_| lossy(&name))?,
            ),
            ColumnData::Float64(v) => {
                let mut narrowed = Vec::with_capacity(v.len());
                for cell in v {
                    let cast = cell.map(|x| x as f32);
                    if let (Some(x), Some(y)) = (cell, cast) {
                        if x.is_finite() && !y.is_finite() {
                            return Err(lossy(&name));
                        }
                    }
                    narrowed.push(cast);
                }
                ColumnData::Float32(narrowed)
            }
            other => return Ok(Column::new(name, other)),
        };
        debug!(column = %name, %from, %to, "column narrowed");
        Ok(Column::new(name, data))
    }
}
