//! Sheet readers: header row → column names, one [`FlatRecord`] per data row.

use std::{io::Read, path::Path};

use calamine::{Data, DataType, Reader, open_workbook_auto};
use punchcard_core::record::FlatRecord;

use crate::error::{Error, Result};

/// Build a record from header/cell pairs, or `None` for a fully blank row.
fn to_record(
  headers: &[String],
  cells: impl IntoIterator<Item = String>,
) -> Option<FlatRecord> {
  let record: FlatRecord = headers
    .iter()
    .zip(cells)
    .filter(|(header, _)| !header.is_empty())
    .map(|(header, value)| (header.clone(), value.trim().to_string()))
    .collect();
  (!record.values().all(|v| v.is_empty())).then_some(record)
}

/// Read CSV with a header row. Rows may be shorter or longer than the header.
pub fn read_csv(reader: impl Read) -> Result<Vec<FlatRecord>> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .from_reader(reader);

  let headers: Vec<String> = reader
    .headers()?
    .iter()
    .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
    .collect();

  let mut records = Vec::new();
  for row in reader.records() {
    let row = row?;
    if let Some(record) = to_record(&headers, row.iter().map(str::to_string)) {
      records.push(record);
    }
  }
  Ok(records)
}

/// Text of a workbook cell. Date cells become `YYYY-MM-DD HH:MM:SS`.
fn cell_text(cell: &Data) -> String {
  match cell {
    Data::Empty => String::new(),
    Data::DateTime(_) | Data::DateTimeIso(_) => cell
      .as_datetime()
      .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
      .unwrap_or_else(|| cell.to_string()),
    other => other.to_string(),
  }
}

/// Read the first worksheet of an XLSX/XLS/ODS workbook.
pub fn read_workbook(path: &Path) -> Result<Vec<FlatRecord>> {
  let mut workbook = open_workbook_auto(path)?;
  let range = workbook.worksheet_range_at(0).ok_or(Error::EmptyWorkbook)??;

  let mut rows = range.rows();
  let Some(header_row) = rows.next() else {
    return Ok(Vec::new());
  };
  let headers: Vec<String> = header_row
    .iter()
    .map(|cell| cell_text(cell).trim().to_string())
    .collect();

  Ok(
    rows
      .filter_map(|row| to_record(&headers, row.iter().map(cell_text)))
      .collect(),
  )
}
