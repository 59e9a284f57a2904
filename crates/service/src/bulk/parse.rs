//! Tabular file parsing for bulk uploads.
//!
//! Accepts CSV and XLSX and returns rows as header -> cell maps with
//! normalized header names, so the importers can treat both formats
//! identically.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};

use crate::errors::ServiceError;

/// One parsed row keyed by normalized header.
pub type Row = HashMap<String, String>;

/// Lowercase, trim, and squash whitespace/hyphens to underscores, so
/// "Student ID", "student-id" and "student_id" all address the same column.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
        .collect()
}

pub fn parse_table(filename: &str, bytes: &[u8]) -> Result<Vec<Row>, ServiceError> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".xlsx") || lower.ends_with(".xls") || lower.ends_with(".xlsm") {
        parse_xlsx(bytes)
    } else {
        parse_csv(bytes)
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<Row>, ServiceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ServiceError::Validation(format!("invalid CSV header: {e}")))?
        .iter()
        .map(normalize_header)
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ServiceError::Validation(format!("invalid CSV row: {e}")))?;
        let mut row = Row::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(cell) = record.get(i) {
                row.insert(header.clone(), cell.trim().to_string());
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn parse_xlsx(bytes: &[u8]) -> Result<Vec<Row>, ServiceError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ServiceError::Validation(format!("cannot open workbook: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ServiceError::Validation("workbook has no sheets".into()))?
        .map_err(|e| ServiceError::Validation(format!("cannot read sheet: {e}")))?;
    let mut iter = range.rows();
    let headers: Vec<String> = match iter.next() {
        Some(header_row) => header_row.iter().map(|c| normalize_header(&c.to_string())).collect(),
        None => return Ok(Vec::new()),
    };
    let mut rows = Vec::new();
    for cells in iter {
        let mut row = Row::new();
        for (i, header) in headers.iter().enumerate() {
            let value = cells.get(i).map(|c| c.to_string()).unwrap_or_default();
            row.insert(header.clone(), value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Fetch a required cell, erroring with the column name when blank.
pub fn require(row: &Row, key: &str) -> Result<String, String> {
    match row.get(key).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!("missing required column '{key}'")),
    }
}

pub fn optional(row: &Row, key: &str) -> Option<String> {
    row.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()).map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_normalized() {
        assert_eq!(normalize_header("Student ID"), "student_id");
        assert_eq!(normalize_header("  First-Name "), "first_name");
        assert_eq!(normalize_header("email"), "email");
    }

    #[test]
    fn csv_rows_are_keyed_by_normalized_header() {
        let data = b"Student ID,First Name,Last Name\nST-001,Jane,Moyo\nST-002,Tino,Ncube\n";
        let rows = parse_table("upload.csv", data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["student_id"], "ST-001");
        assert_eq!(rows[1]["first_name"], "Tino");
    }

    #[test]
    fn require_reports_blank_cells() {
        let data = b"student_id,first_name\n,Jane\n";
        let rows = parse_table("upload.csv", data).unwrap();
        assert!(require(&rows[0], "student_id").is_err());
        assert_eq!(require(&rows[0], "first_name").unwrap(), "Jane");
    }

    #[test]
    fn unknown_extension_falls_back_to_csv() {
        let data = b"a,b\n1,2\n";
        let rows = parse_table("upload.txt", data).unwrap();
        assert_eq!(rows[0]["a"], "1");
    }
}
