//! Error types for the punchcard spreadsheet codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unsupported file format {0:?} (expected csv, xlsx or xls)")]
  UnsupportedFormat(String),

  #[error("workbook has no worksheet")]
  EmptyWorkbook,

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("excel error: {0}")]
  Excel(#[from] calamine::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
