//! Punch records — the immutable input of the pipeline.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A single timestamped clock-in/out event for a user.
///
/// `timestamp` is the wall-clock time exactly as written by the timeclock, with
/// no timezone attached. The calendar date and the clock time of a punch are
/// both taken from it, so they can never disagree near midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchRecord {
  pub user_id:    String,
  pub department: String,
  pub name:       String,
  pub timestamp:  NaiveDateTime,
}

impl PunchRecord {
  pub fn new(
    user_id: &str,
    department: &str,
    name: &str,
    timestamp: NaiveDateTime,
  ) -> Self {
    Self {
      user_id: user_id.to_string(),
      department: department.to_string(),
      name: name.to_string(),
      timestamp,
    }
  }

  /// Calendar date of the punch.
  pub fn date(&self) -> NaiveDate { self.timestamp.date() }

  /// Clock time of the punch truncated to the minute.
  pub fn clock_time(&self) -> NaiveTime { truncate_to_minute(self.timestamp.time()) }
}

pub(crate) fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
  time
    .with_second(0)
    .and_then(|t| t.with_nanosecond(0))
    .unwrap_or(time)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn clock_time_drops_seconds() {
    let ts = NaiveDate::from_ymd_opt(2024, 3, 4)
      .unwrap()
      .and_hms_milli_opt(8, 29, 59, 750)
      .unwrap();
    let punch = PunchRecord::new("1", "TALLER", "Ana", ts);
    assert_eq!(punch.clock_time().format("%H:%M:%S%.f").to_string(), "08:29:00");
    assert_eq!(punch.date(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
  }
}
