//! Cell parsing and per-column type inference for raw flow CSV text.

use crate::table::{Column, ColumnData, StorageType};
use std::collections::HashMap;

/// Empty cells and `NaN` markers are missing values.
pub(crate) fn is_missing(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("nan")
}

pub(crate) fn parse_int(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

/// Reals, including the `Infinity` sentinels the flow exporter writes for zero-duration rates.
pub(crate) fn parse_real(raw: &str) -> Option<f64> {
    let lower = raw.to_ascii_lowercase();
    match lower.as_str() {
        "infinity" | "+infinity" | "inf" | "+inf" => Some(f64::INFINITY),
        "-infinity" | "-inf" => Some(f64::NEG_INFINITY),
        _ => raw.parse::<f64>().ok().filter(|v| !v.is_nan()),
    }
}

/// Trim header names and make duplicates unique with a `.N` suffix.
pub(crate) fn normalize_headers<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for name in raw {
        let base = name.trim().to_string();
        let n = seen.entry(base.clone()).or_insert(0);
        if *n == 0 {
            out.push(base);
        } else {
            out.push(format!("{}.{}", base, n));
        }
        *n += 1;
    }
    out
}

/// Narrowest of int64, float64, string that holds every present cell.
pub(crate) fn infer_type(cells: &[String]) -> StorageType {
    let mut all_int = true;
    for cell in cells.iter().map(|c| c.trim()).filter(|c| !is_missing(c)) {
        if all_int && parse_int(cell).is_some() {
            continue;
        }
        all_int = false;
        if parse_real(cell).is_none() {
            return StorageType::String;
        }
    }
    if all_int {
        StorageType::Int64
    } else {
        StorageType::Float64
    }
}

pub(crate) fn build_column(name: String, cells: Vec<String>) -> Column {
    let data = match infer_type(&cells) {
        StorageType::Int64 | StorageType::Int32 => ColumnData::Int64(
            cells
                .iter()
                .map(|c| c.trim())
                .map(|c| if is_missing(c) { None } else { parse_int(c) })
                .collect(),
        ),
        StorageType::Float64 | StorageType::Float32 => ColumnData::Float64(
            cells
                .iter()
                .map(|c| c.trim())
                .map(|c| if is_missing(c) { None } else { parse_real(c) })
                .collect(),
        ),
        StorageType::String => ColumnData::Text(
            cells
                .iter()
                .map(|c| c.trim())
                .map(|c| if is_missing(c) { None } else { Some(c.to_string()) })
                .collect(),
        ),
    };
    Column::new(name, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infinity_spellings() {
        assert_eq!(parse_real("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_real("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_real("inf"), Some(f64::INFINITY));
        assert_eq!(parse_real("NaN"), None);
        assert_eq!(parse_real("1.5e3"), Some(1500.0));
    }

    #[test]
    fn headers_trimmed_and_deduplicated() {
        let h = normalize_headers(vec![" Flow ID", " Fwd Header Length", "Fwd Header Length ", "Label"]);
        assert_eq!(h, vec!["Flow ID", "Fwd Header Length", "Fwd Header Length.1", "Label"]);
    }

    #[test]
    fn inference_prefers_narrowest() {
        assert_eq!(infer_type(&cells(&["1", "", "-1"])), StorageType::Int64);
        assert_eq!(infer_type(&cells(&["1", "2.5", "Infinity", "NaN"])), StorageType::Float64);
        assert_eq!(infer_type(&cells(&["BENIGN", "1"])), StorageType::String);
        assert_eq!(infer_type(&cells(&["", ""])), StorageType::Int64);
    }

    #[test]
    fn build_column_maps_missing_markers() {
        let c = build_column("Flow Bytes/s".into(), cells(&["10.5", "NaN", "Infinity", ""]));
        assert_eq!(
            c.data,
            ColumnData::Float64(vec![Some(10.5), None, Some(f64::INFINITY), None])
        );
        let t = build_column("Label".into(), cells(&["BENIGN", ""]));
        assert_eq!(t.data, ColumnData::Text(vec![Some("BENIGN".into()), None]));
    }

    #[test]
    fn text_cells_trimmed_and_nan_is_missing() {
        let t = build_column("Label".into(), cells(&[" ", "NaN", " BENIGN ", "nan", "DoS Hulk"]));
        assert_eq!(
            t.data,
            ColumnData::Text(vec![None, None, Some("BENIGN".into()), None, Some("DoS Hulk".into())])
        );
        assert_eq!(t.data.missing_count(), 3);
    }
}
