//! Deviation of actual clock times from the expected schedule.

use std::{cmp::Ordering, fmt};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
  day::{DayRecord, Slot},
  schedule::ExpectedTimes,
};

// ─── Deviation value ─────────────────────────────────────────────────────────

/// Signed difference between an actual and an expected clock time, in whole
/// minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deviation {
  Early(u32),
  Late(u32),
  OnTime,
}

/// Language used to render deviations in output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  #[serde(alias = "english")]
  En,
  /// `temprano por N minutos`, `tarde por N minutos`, `a tiempo`.
  #[serde(alias = "spanish")]
  Es,
}

impl Deviation {
  pub fn render(self, language: Language) -> String {
    match (language, self) {
      (Language::En, Deviation::Early(m)) => format!("early by {m} minutes"),
      (Language::En, Deviation::Late(m)) => format!("late by {m} minutes"),
      (Language::En, Deviation::OnTime) => "on time".to_string(),
      (Language::Es, Deviation::Early(m)) => format!("temprano por {m} minutos"),
      (Language::Es, Deviation::Late(m)) => format!("tarde por {m} minutos"),
      (Language::Es, Deviation::OnTime) => "a tiempo".to_string(),
    }
  }
}

impl fmt::Display for Deviation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render(Language::En))
  }
}

// ─── Calculation ─────────────────────────────────────────────────────────────

fn minutes_since_midnight(time: NaiveTime) -> i64 {
  i64::from(time.hour() * 60 + time.minute())
}

/// Compare `actual` against `expected` at minute precision.
pub fn compare(actual: NaiveTime, expected: NaiveTime) -> Deviation {
  let diff = minutes_since_midnight(actual) - minutes_since_midnight(expected);
  // |diff| < 24 * 60, always fits.
  let magnitude = diff.unsigned_abs() as u32;
  match diff.cmp(&0) {
    Ordering::Less => Deviation::Early(magnitude),
    Ordering::Greater => Deviation::Late(magnitude),
    Ordering::Equal => Deviation::OnTime,
  }
}

/// The expected time `slot` of `day` is measured against, if the schedule has
/// one.
///
/// A day with only entrance1 and exit1 is treated as a day without a midday
/// break: its exit1 is measured against the end-of-day exit. Schedules
/// without an afternoon span use exit1 as the end-of-day exit and have no
/// expected entrance2.
pub fn expected_for(day: &DayRecord, slot: Slot, expected: &ExpectedTimes) -> Option<NaiveTime> {
  match slot {
    Slot::Entrance1 => Some(expected.entrance1),
    Slot::Exit1 if day.is_single_pair() => Some(expected.end_of_day()),
    Slot::Exit1 => Some(expected.exit1),
    Slot::Entrance2 => expected.entrance2,
    Slot::Exit2 => Some(expected.end_of_day()),
  }
}

/// Fill the deviation of every filled slot of `day`. Unfilled slots, and
/// slots the schedule has no expected time for, get no deviation.
pub fn annotate(mut day: DayRecord, expected: &ExpectedTimes) -> DayRecord {
  for slot in Slot::ALL {
    let deviation = match (day.time(slot), expected_for(&day, slot, expected)) {
      (Some(actual), Some(target)) => Some(compare(actual, target)),
      (Some(_), None) => {
        tracing::debug!(
          user_id = %day.user_id,
          date = %day.date,
          ?slot,
          "schedule has no expected time for slot; leaving deviation empty"
        );
        None
      }
      (None, _) => None,
    };
    day.set_deviation(slot, deviation);
  }
  day
}
