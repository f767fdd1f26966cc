//! Loading batch records, replacement maps and keyword lists from JSON and CSV.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{ForgeError, Result};
use crate::keywords::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(DataFormat::Json),
            "csv" => Ok(DataFormat::Csv),
            _ => Err(ForgeError::UnsupportedDataFormat(path.display().to_string())),
        }
    }
}

/// Reads batch records from a `.json` or `.csv` file.
///
/// JSON must be an array of flat objects. CSV needs a header row and at least one
/// data row; rows whose width differs from the header are skipped.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let format = DataFormat::from_path(path)?;
    let records = match format {
        DataFormat::Json => read_to_string(path).and_then(|s| records_from_json(&s)),
        DataFormat::Csv => fs::File::open(path)
            .map_err(ForgeError::from)
            .and_then(records_from_csv),
    }
    .map_err(|e| ForgeError::data_file(path, e))?;

    log::info!("loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Reads a single JSON object of field → value pairs.
pub fn read_replacements(path: &Path) -> Result<Record> {
    read_to_string(path)
        .and_then(|s| {
            let value: Value = serde_json::from_str(&s)?;
            match value {
                Value::Object(map) => flatten_object(map),
                other => Err(ForgeError::MalformedData(format!(
                    "expected a JSON object of replacements, found {}",
                    type_name(&other)
                ))),
            }
        })
        .map_err(|e| ForgeError::data_file(path, e))
}

/// Reads the keyword names to look for in a document.
///
/// * CSV: the header row.
/// * JSON: an array of strings, the keys of the first object of an array, or the keys
///   of an object.
pub fn read_keyword_list(path: &Path) -> Result<Vec<String>> {
    let format = DataFormat::from_path(path)?;
    match format {
        DataFormat::Csv => fs::File::open(path)
            .map_err(ForgeError::from)
            .and_then(keywords_from_csv),
        DataFormat::Json => read_to_string(path).and_then(|s| keywords_from_json(&s)),
    }
    .map_err(|e| ForgeError::data_file(path, e))
}

/// Splits a comma-separated `--keys` argument, dropping blanks.
pub fn split_keys(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn records_from_json(input: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(input)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ForgeError::MalformedData(format!(
                "expected a JSON array of records, found {}",
                type_name(&other)
            )))
        }
    };
    if items.is_empty() {
        return Err(ForgeError::NoRecords);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => flatten_object(map),
            other => Err(ForgeError::MalformedData(format!(
                "record {} is {}, expected an object",
                i + 1,
                type_name(&other)
            ))),
        })
        .collect()
}

pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(csv_too_short());
    }

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        if row.len() != headers.len() {
            log::warn!(
                "skipping CSV row {}: {} field(s), header has {}",
                i + 2,
                row.len(),
                headers.len()
            );
            continue;
        }
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        records.push(record);
    }

    if records.is_empty() {
        return Err(csv_too_short());
    }
    Ok(records)
}

fn keywords_from_csv<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let keys: Vec<String> = rdr
        .headers()?
        .iter()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if keys.is_empty() {
        return Err(ForgeError::MalformedData("CSV header row is empty".to_string()));
    }
    Ok(keys)
}

pub fn keywords_from_json(input: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(input)?;
    match value {
        Value::Object(map) => Ok(map.keys().cloned().collect()),
        Value::Array(items) => match items.first() {
            Some(Value::Object(first)) => Ok(first.keys().cloned().collect()),
            Some(Value::String(_)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(ForgeError::MalformedData(format!(
                        "keyword list mixes strings with {}",
                        type_name(other)
                    ))),
                })
                .collect(),
            Some(other) => Err(ForgeError::MalformedData(format!(
                "unsupported keyword list entry: {}",
                type_name(other)
            ))),
            None => Err(ForgeError::MalformedData("keyword list is empty".to_string())),
        },
        other => Err(ForgeError::MalformedData(format!(
            "unsupported keyword list: {}",
            type_name(&other)
        ))),
    }
}

fn flatten_object(map: Map<String, Value>) -> Result<Record> {
    map.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                nested => {
                    return Err(ForgeError::MalformedData(format!(
                        "field {key:?} holds {}",
                        type_name(&nested)
                    )))
                }
            };
            Ok((key, text))
        })
        .collect()
}

fn read_to_string(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

fn csv_too_short() -> ForgeError {
    ForgeError::MalformedData(
        "CSV must have at least a header row and one data row".to_string(),
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_scalars_are_stringified() {
        let records =
            records_from_json(r#"[{"NAME": "Ada", "AGE": 36, "VIP": true, "NOTE": null}]"#)
                .unwrap();
        let r = &records[0];
        assert_eq!(r["NAME"], "Ada");
        assert_eq!(r["AGE"], "36");
        assert_eq!(r["VIP"], "true");
        assert_eq!(r["NOTE"], "");
    }

    #[test]
    fn nested_json_values_are_rejected() {
        let err = records_from_json(r#"[{"A": {"b": 1}}]"#).unwrap_err();
        assert!(matches!(err, ForgeError::MalformedData(_)));
        assert!(matches!(records_from_json("[]"), Err(ForgeError::NoRecords)));
        assert!(matches!(
            records_from_json(r#"{"A": 1}"#),
            Err(ForgeError::MalformedData(_))
        ));
    }

    #[test]
    fn csv_rows_with_wrong_width_are_skipped() {
        let input = "NAME,CITY\nAda,London\nbroken\nAlan,Wilmslow\n";
        let records = records_from_csv(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["NAME"], "Alan");
        assert_eq!(records[1]["CITY"], "Wilmslow");
    }

    #[test]
    fn csv_needs_a_data_row() {
        assert!(matches!(
            records_from_csv("NAME,CITY\n".as_bytes()),
            Err(ForgeError::MalformedData(_))
        ));
    }

    #[test]
    fn keyword_lists_from_every_json_shape() {
        assert_eq!(keywords_from_json(r#"["A", "B"]"#).unwrap(), vec!["A", "B"]);
        let mut from_first = keywords_from_json(r#"[{"B": 1, "A": 2}, {"C": 3}]"#).unwrap();
        from_first.sort();
        assert_eq!(from_first, vec!["A", "B"]);
        assert_eq!(keywords_from_json(r#"{"X": "1"}"#).unwrap(), vec!["X"]);
        assert!(keywords_from_json("[1, 2]").is_err());
        assert!(keywords_from_json("[]").is_err());
    }

    #[test]
    fn splits_key_arguments() {
        assert_eq!(split_keys(" A, B ,,C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        assert!(matches!(
            read_records(Path::new("records.xml")),
            Err(ForgeError::UnsupportedDataFormat(_))
        ));
    }
}
