// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::ui::messages::info;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One table row as a JSON object, keys in column order.
struct JsonRow<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (i, h) in self.headers.iter().enumerate() {
            let cell = self.cells.get(i).map(String::as_str).unwrap_or("");
            map.serialize_entry(h, cell)?;
        }
        map.end()
    }
}

struct JsonTable<'a> {
    headers: &'a [String],
    rows: &'a [Vec<String>],
}

impl Serialize for JsonTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for cells in self.rows {
            seq.serialize_element(&JsonRow {
                headers: self.headers,
                cells,
            })?;
        }
        seq.end()
    }
}

pub(crate) fn table_to_json(headers: &[String], rows: &[Vec<String>]) -> AppResult<String> {
    serde_json::to_string_pretty(&JsonTable { headers, rows })
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))
}

/// Export JSON pretty-printed: an array of objects keyed by column name.
pub(crate) fn export_json(headers: &[String], rows: &[Vec<String>], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = table_to_json(headers, rows)?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Export CSV with a header line.
pub(crate) fn export_csv(headers: &[String], rows: &[Vec<String>], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    wtr.write_record(headers)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;

    for row in rows {
        wtr.write_record(row)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_column_order() {
        let headers = vec!["Badge ID".to_string(), "Name".to_string(), "A".to_string()];
        let rows = vec![vec!["5".to_string(), "Alice".to_string(), "✅".to_string()]];

        let json = table_to_json(&headers, &rows).unwrap();
        let badge = json.find("Badge ID").unwrap();
        let name = json.find("Name").unwrap();
        let a = json.find("\"A\"").unwrap();
        assert!(badge < name && name < a);
        assert!(json.contains("✅"));
    }
}
