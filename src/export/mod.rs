//! # Value Export
//!
//! Reads filled-form value sets (a JSON object of field name to value per
//! document) and writes them out as spreadsheets: a two-column sheet for a
//! single document, or a combined matrix with one row per document for a
//! batch. Field names are always emitted in sorted order so diffs between
//! exports line up.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::error::{MarkformError, Result};

/// A single document's extracted values, keyed by field name. The map is
/// ordered so exports are deterministic.
pub type ValueSet = BTreeMap<String, String>;

/// Read one JSON value file into a normalized value set.
pub fn read_values(path: &Path) -> Result<ValueSet> {
    let file = File::open(path).map_err(|source| MarkformError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: BTreeMap<String, Value> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| MarkformError::Values {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(raw.into_iter().map(|(name, value)| (name, normalize_value(&value))).collect())
}

/// Normalize one raw field value to display text.
///
/// PDF-style checkbox states arrive as name objects: `/Yes` means checked,
/// `/Off` unchecked, and any other `/Name` keeps its text. Booleans map to
/// the same Yes/No vocabulary; missing values become empty strings.
pub fn normalize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) => match s.as_str() {
            "/Yes" => "Yes".to_string(),
            "/Off" => "No".to_string(),
            other => other.strip_prefix('/').unwrap_or(other).to_string(),
        },
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Write one document's values as a two-column sheet, sorted by field name.
///
/// Returns `false` without creating the file when the value set is empty.
pub fn export_single(values: &ValueSet, out: &Path) -> Result<bool> {
    if values.is_empty() {
        log::warn!("no field values to export; {} not written", out.display());
        return Ok(false);
    }
    let mut writer = csv::Writer::from_path(out).map_err(MarkformError::Export)?;
    writer.write_record(["Field Name", "Value"])?;
    for (name, value) in values {
        writer.write_record([name.as_str(), value.as_str()])?;
    }
    writer.flush().map_err(|source| MarkformError::Io {
        path: out.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Write a batch of documents as one matrix: a source column, then the
/// sorted union of every field name across the batch. Documents missing a
/// field get an empty cell.
pub fn export_combined(sources: &[(String, ValueSet)], out: &Path) -> Result<bool> {
    let columns: BTreeSet<&str> = sources
        .iter()
        .flat_map(|(_, values)| values.keys().map(String::as_str))
        .collect();
    if columns.is_empty() {
        log::warn!("no field values to export; {} not written", out.display());
        return Ok(false);
    }

    let mut writer = csv::Writer::from_path(out).map_err(MarkformError::Export)?;
    let mut header = vec!["Source"];
    header.extend(columns.iter().copied());
    writer.write_record(&header)?;

    for (source, values) in sources {
        let mut row = vec![source.as_str()];
        for column in &columns {
            row.push(values.get(*column).map_or("", String::as_str));
        }
        writer.write_record(&row)?;
    }
    writer.flush().map_err(|source| MarkformError::Io {
        path: out.to_path_buf(),
        source,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: &[(&str, &str)]) -> ValueSet {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn checkbox_name_objects_normalize_to_yes_no() {
        assert_eq!(normalize_value(&json!("/Yes")), "Yes");
        assert_eq!(normalize_value(&json!("/Off")), "No");
        assert_eq!(normalize_value(&json!("/Other")), "Other");
    }

    #[test]
    fn plain_values_pass_through() {
        assert_eq!(normalize_value(&json!("Ada")), "Ada");
        assert_eq!(normalize_value(&json!(42)), "42");
        assert_eq!(normalize_value(&json!(true)), "Yes");
        assert_eq!(normalize_value(&json!(null)), "");
    }

    #[test]
    fn single_export_is_sorted_two_column() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let ok = export_single(&values(&[("zeta", "1"), ("alpha", "2")]), &out).unwrap();
        assert!(ok);
        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Field Name,Value", "alpha,2", "zeta,1"]);
    }

    #[test]
    fn empty_set_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let ok = export_single(&ValueSet::new(), &out).unwrap();
        assert!(!ok);
        assert!(!out.exists());
    }

    #[test]
    fn combined_export_unions_columns() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("combined.csv");
        let sources = vec![
            ("a.json".to_string(), values(&[("name", "Ada"), ("age", "36")])),
            ("b.json".to_string(), values(&[("name", "Grace"), ("city", "NYC")])),
        ];
        let ok = export_combined(&sources, &out).unwrap();
        assert!(ok);
        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Source,age,city,name");
        assert_eq!(lines[1], "a.json,36,,Ada");
        assert_eq!(lines[2], "b.json,,NYC,Grace");
    }

    #[test]
    fn read_values_normalizes_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.json");
        std::fs::write(&path, r#"{"agree": "/Yes", "name": "Ada", "optional": null}"#).unwrap();
        let set = read_values(&path).unwrap();
        assert_eq!(set["agree"], "Yes");
        assert_eq!(set["name"], "Ada");
        assert_eq!(set["optional"], "");
    }

    #[test]
    fn malformed_json_reports_values_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_values(&path).unwrap_err();
        assert!(matches!(err, MarkformError::Values { .. }));
    }
}
