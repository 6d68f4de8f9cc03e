//! File content parsing for bulk uploads.
//!
//! Turns an uploaded CSV or spreadsheet into untyped rows keyed by the
//! header row. Nothing here knows about parts; the row validator interprets
//! the cells.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use csv::ReaderBuilder;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::RawRow;

/// How an accepted MIME type is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// xlsx or legacy xls; the concrete format is sniffed from the bytes
    Spreadsheet,
    Csv,
}

/// Accepted upload MIME types, in the order reported to clients.
pub const ALLOWED_FILE_TYPES: &[(&str, FileKind)] = &[
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        FileKind::Spreadsheet,
    ),
    ("application/vnd.ms-excel", FileKind::Spreadsheet),
    ("text/csv", FileKind::Csv),
    ("application/csv", FileKind::Csv),
];

impl FileKind {
    /// Look up a declared MIME type. Parameters such as `charset` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        ALLOWED_FILE_TYPES
            .iter()
            .find(|(allowed, _)| allowed.eq_ignore_ascii_case(essence))
            .map(|(_, kind)| *kind)
    }
}

/// Parse an uploaded file into rows.
///
/// Fully blank rows are dropped. Any structural problem fails the whole file.
pub fn parse_file_content(bytes: &[u8], kind: FileKind) -> AppResult<Vec<RawRow>> {
    match kind {
        FileKind::Csv => parse_csv(bytes),
        FileKind::Spreadsheet => parse_spreadsheet(bytes),
    }
}

fn parse_csv(bytes: &[u8]) -> AppResult<Vec<RawRow>> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::Parse(format!("Invalid CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::Parse(format!("Invalid CSV content: {}", e)))?;

        let row = build_row(
            &headers,
            record.iter().map(|cell| Value::String(cell.to_string())),
        );
        if !is_blank(&row) {
            rows.push(row);
        }
    }

    Ok(rows)
}

fn parse_spreadsheet(bytes: &[u8]) -> AppResult<Vec<RawRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::Parse(format!("Unreadable workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::Parse("Workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| AppError::Parse(format!("Unreadable sheet '{}': {}", sheet_name, e)))?;

    let mut cells = range.rows();
    let headers: Vec<String> = match cells.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let rows = cells
        .map(|data_row| build_row(&headers, data_row.iter().map(cell_to_value)))
        .filter(|row| !is_blank(row))
        .collect();

    Ok(rows)
}

/// Zip a row's cells with the headers. Cells under an empty header are dropped.
fn build_row(headers: &[String], cells: impl Iterator<Item = Value>) -> RawRow {
    let mut row = RawRow::new();
    for (header, value) in headers.iter().zip(cells) {
        if !header.is_empty() {
            row.insert(header.clone(), value);
        }
    }
    row
}

fn is_blank(row: &RawRow) -> bool {
    row.values().all(|v| match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime() {
        assert_eq!(FileKind::from_mime("text/csv"), Some(FileKind::Csv));
        assert_eq!(
            FileKind::from_mime("text/csv; charset=utf-8"),
            Some(FileKind::Csv)
        );
        assert_eq!(
            FileKind::from_mime("application/vnd.ms-excel"),
            Some(FileKind::Spreadsheet)
        );
        assert_eq!(FileKind::from_mime("image/png"), None);
        assert_eq!(FileKind::from_mime(""), None);
    }

    #[test]
    fn test_csv_rows_keyed_by_trimmed_header() {
        let csv = "area , machine,machineNo\nTurbine,Lathe, 12 \n";
        let rows = parse_file_content(csv.as_bytes(), FileKind::Csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["area"], "Turbine");
        assert_eq!(rows[0]["machine"], "Lathe");
        // Cells are kept verbatim; trimming is the validator's job
        assert_eq!(rows[0]["machineNo"], " 12 ");
    }

    #[test]
    fn test_csv_skips_blank_rows() {
        let csv = "a,b\n1,2\n,\n  ,  \n3,4\n";
        let rows = parse_file_content(csv.as_bytes(), FileKind::Csv).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["a"], "3");
    }

    #[test]
    fn test_csv_strips_bom_and_tolerates_short_rows() {
        let csv = "\u{feff}partNo,partDetail\nP-1\n";
        let rows = parse_file_content(csv.as_bytes(), FileKind::Csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["partNo"], "P-1");
        assert!(rows[0].get("partDetail").is_none());
    }

    #[test]
    fn test_csv_header_only_yields_no_rows() {
        let rows = parse_file_content(b"a,b,c\n", FileKind::Csv).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_csv_invalid_utf8_is_parse_error() {
        let bytes = b"a,b\n\xff\xfe,1\n";
        let err = parse_file_content(bytes, FileKind::Csv).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_spreadsheet_rows_keyed_by_first_row() {
        let bytes = include_bytes!("../../tests/fixtures/parts.xlsx");
        let rows = parse_file_content(bytes, FileKind::Spreadsheet).unwrap();

        // The blank third row is skipped
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["area"], "Turbine");
        assert_eq!(rows[0]["machineNo"].as_f64(), Some(12345.0));
        assert_eq!(rows[0]["installedQuantity"].as_f64(), Some(4.0));
        assert_eq!(rows[1]["partNo"], "P-200");
        assert_eq!(rows[1]["availableQuantity"].as_f64(), Some(0.0));
    }

    #[test]
    fn test_numeric_spreadsheet_cells_validate_as_text() {
        let bytes = include_bytes!("../../tests/fixtures/parts.xlsx");
        let rows = parse_file_content(bytes, FileKind::Spreadsheet).unwrap();

        let row = crate::services::validator::validate_row(&rows[0]).unwrap();
        assert_eq!(row.machine_no, "12345");
        assert_eq!(row.part_no, "777");
        assert_eq!(row.installed_quantity, 4);
        assert_eq!(row.available_quantity, 2);
    }

    #[test]
    fn test_corrupt_spreadsheet_is_parse_error() {
        let err = parse_file_content(b"definitely not a workbook", FileKind::Spreadsheet)
            .unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_to_value(&Data::Empty), Value::Null);
        assert_eq!(cell_to_value(&Data::Int(7)), Value::from(7));
        assert_eq!(cell_to_value(&Data::Float(2.5)), Value::from(2.5));
        assert_eq!(cell_to_value(&Data::Bool(true)), Value::Bool(true));
        assert_eq!(
            cell_to_value(&Data::String("EM".into())),
            Value::String("EM".into())
        );
    }
}
