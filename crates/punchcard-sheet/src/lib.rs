//! Spreadsheet codec for punchcard.
//!
//! Reads timeclock exports (CSV, XLSX, XLS) into the flat records consumed by
//! [`punchcard_core::pipeline::Pipeline`], and writes processed rows back out
//! as CSV. Pure synchronous; the first worksheet of a workbook is used and its
//! first row supplies the column names.
//!
//! ```no_run
//! use punchcard_sheet::{read_records, write_records};
//!
//! let records = read_records("punches.xlsx").unwrap();
//! println!("{} rows", records.len());
//! write_records("processed_file.csv", &[]).unwrap();
//! ```

pub mod error;
mod read;
mod write;

use std::path::Path;

pub use error::{Error, Result};
pub use read::{read_csv, read_workbook};
pub use write::write_csv;

use punchcard_core::record::{FlatRecord, OutputRow};

/// Input file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  Csv,
  Workbook,
}

impl Format {
  pub fn from_path(path: &Path) -> Result<Self> {
    let ext = path
      .extension()
      .and_then(|e| e.to_str())
      .unwrap_or("")
      .to_ascii_lowercase();
    match ext.as_str() {
      "csv" => Ok(Format::Csv),
      "xlsx" | "xlsm" | "xls" | "ods" => Ok(Format::Workbook),
      _ => Err(Error::UnsupportedFormat(ext)),
    }
  }
}

/// Read every data row of the file at `path`.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<FlatRecord>> {
  let path = path.as_ref();
  let records = match Format::from_path(path)? {
    Format::Csv => read_csv(std::fs::File::open(path)?)?,
    Format::Workbook => read_workbook(path)?,
  };
  tracing::debug!(path = %path.display(), rows = records.len(), "read input sheet");
  Ok(records)
}

/// Write `rows` as CSV to `path`, replacing any existing file.
pub fn write_records(path: impl AsRef<Path>, rows: &[OutputRow]) -> Result<()> {
  let file = std::fs::File::create(path.as_ref())?;
  write_csv(file, rows)
}
