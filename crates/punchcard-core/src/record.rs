//! Mapping between flat spreadsheet records and the pipeline's typed records.
//!
//! Input rows carry the timeclock export's Spanish column names; output rows
//! use the column names of the processed attendance sheet.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use crate::{
  day::{DayRecord, Slot},
  deviation::Language,
  punch::PunchRecord,
};

// ─── Input ───────────────────────────────────────────────────────────────────

pub const USER_ID: &str = "Nro. de usuario";
pub const TIMESTAMP: &str = "Fecha/Hora";
pub const DEPARTMENT: &str = "Departamento";
pub const NAME: &str = "Nombre";

/// One row of the input sheet: column name → cell text.
pub type FlatRecord = HashMap<String, String>;

/// Why a flat record could not be turned into a [`PunchRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
  #[error("missing {0:?} field")]
  MissingField(&'static str),

  #[error("unparseable date-time {0:?}")]
  InvalidTimestamp(String),
}

const TIMESTAMP_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y/%m/%d %H:%M:%S%.f",
  "%Y/%m/%d %H:%M",
  "%d/%m/%Y %H:%M:%S%.f",
  "%d/%m/%Y %H:%M",
];

/// Parse a timeclock date-time. RFC 3339 values keep their wall-clock time and
/// drop the offset.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
  let value = value.trim();
  TIMESTAMP_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()))
}

fn field<'a>(record: &'a FlatRecord, name: &'static str) -> Option<&'a str> {
  record.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Decode one input row. User id and date-time are required; department and
/// name default to empty.
pub fn decode_punch(record: &FlatRecord) -> Result<PunchRecord, DecodeError> {
  let user_id = field(record, USER_ID).ok_or(DecodeError::MissingField(USER_ID))?;
  let raw_time = field(record, TIMESTAMP).ok_or(DecodeError::MissingField(TIMESTAMP))?;
  let timestamp = parse_timestamp(raw_time)
    .ok_or_else(|| DecodeError::InvalidTimestamp(raw_time.to_string()))?;

  Ok(PunchRecord::new(
    user_id,
    field(record, DEPARTMENT).unwrap_or_default(),
    field(record, NAME).unwrap_or_default(),
    timestamp,
  ))
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// Column names of the processed sheet, in order.
pub const OUTPUT_FIELDS: [&str; 12] = [
  "fecha",
  "departamento",
  "nombre",
  "idUsuario",
  "entrada1",
  "salida1",
  "entrada2",
  "salida2",
  "entrada1_sin",
  "salida1_sin",
  "entrada2_sin",
  "salida2_sin",
];

/// One row of the processed sheet. Empty slots and deviations are empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputRow {
  #[serde(rename = "fecha")]
  pub date:                String,
  #[serde(rename = "departamento")]
  pub department:          String,
  #[serde(rename = "nombre")]
  pub name:                String,
  #[serde(rename = "idUsuario")]
  pub user_id:             String,
  #[serde(rename = "entrada1")]
  pub entrance1:           String,
  #[serde(rename = "salida1")]
  pub exit1:               String,
  #[serde(rename = "entrada2")]
  pub entrance2:           String,
  #[serde(rename = "salida2")]
  pub exit2:               String,
  #[serde(rename = "entrada1_sin")]
  pub entrance1_deviation: String,
  #[serde(rename = "salida1_sin")]
  pub exit1_deviation:     String,
  #[serde(rename = "entrada2_sin")]
  pub entrance2_deviation: String,
  #[serde(rename = "salida2_sin")]
  pub exit2_deviation:     String,
}

impl OutputRow {
  pub fn from_day(day: &DayRecord, language: Language) -> Self {
    let time = |slot: Slot| {
      day
        .time(slot)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
    };
    let deviation = |slot: Slot| {
      day
        .deviation(slot)
        .map(|d| d.render(language))
        .unwrap_or_default()
    };

    Self {
      date:                day.date.format("%Y-%m-%d").to_string(),
      department:          day.department.clone(),
      name:                day.name.clone(),
      user_id:             day.user_id.clone(),
      entrance1:           time(Slot::Entrance1),
      exit1:               time(Slot::Exit1),
      entrance2:           time(Slot::Entrance2),
      exit2:               time(Slot::Exit2),
      entrance1_deviation: deviation(Slot::Entrance1),
      exit1_deviation:     deviation(Slot::Exit1),
      entrance2_deviation: deviation(Slot::Entrance2),
      exit2_deviation:     deviation(Slot::Exit2),
    }
  }
}
