//! Error types for `punchcard-core`.
//!
//! Only schedule configuration can fail. Malformed punch records and slot
//! overflow are recovered inside the pipeline and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("schedule table has no default entry")]
  MissingDefaultSchedule,

  #[error("schedule table has {0} default entries; exactly one is required")]
  DuplicateDefaultSchedule(usize),

  #[error("invalid {field} time {value:?} in schedule {selector:?} (expected HH:MM)")]
  InvalidTime {
    selector: String,
    field:    &'static str,
    value:    String,
  },

  /// `entrance2` and `exit2` must be configured together.
  #[error("schedule {0:?} sets only one of entrance2/exit2")]
  IncompleteAfternoon(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
