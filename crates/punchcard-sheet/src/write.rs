//! CSV writer for processed rows.

use std::io::Write;

use punchcard_core::record::{OUTPUT_FIELDS, OutputRow};

use crate::error::Result;

/// Write a header row followed by `rows`. The header is written even when
/// there are no rows.
pub fn write_csv(writer: impl Write, rows: &[OutputRow]) -> Result<()> {
  let mut writer = csv::WriterBuilder::new()
    .has_headers(false)
    .from_writer(writer);

  writer.write_record(OUTPUT_FIELDS)?;
  for row in rows {
    writer.serialize(row)?;
  }
  writer.flush()?;
  Ok(())
}
