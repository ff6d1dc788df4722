//! Expected schedules and the priority lookup that selects one per user-day.
//!
//! The schedule table is plain configuration: a list of [`ScheduleEntry`]
//! values with `HH:MM` strings. [`ScheduleResolver::new`] validates it once and
//! compiles it into typed [`ExpectedTimes`]; after that, lookups cannot fail.

use std::collections::HashMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Configuration types ─────────────────────────────────────────────────────

/// Which punches a schedule entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
  /// Matches a single user id.
  #[serde(alias = "particular")]
  User,
  /// Matches every user of a department.
  #[serde(alias = "grupo")]
  Department,
  /// Fallback for everyone else. Exactly one must exist.
  Default,
}

/// Expected clock times as written in configuration (`HH:MM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTimes {
  pub entrance1: String,
  pub exit1:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub entrance2: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub exit2:     Option<String>,
}

impl ScheduleTimes {
  /// A single continuous span with no midday break.
  pub fn single(entrance: &str, exit: &str) -> Self {
    Self {
      entrance1: entrance.to_string(),
      exit1:     exit.to_string(),
      entrance2: None,
      exit2:     None,
    }
  }

  /// A morning span and an afternoon span.
  pub fn split(entrance1: &str, exit1: &str, entrance2: &str, exit2: &str) -> Self {
    Self {
      entrance1: entrance1.to_string(),
      exit1:     exit1.to_string(),
      entrance2: Some(entrance2.to_string()),
      exit2:     Some(exit2.to_string()),
    }
  }
}

/// One row of the schedule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
  pub kind:     ScheduleKind,
  /// User id or department name; ignored for [`ScheduleKind::Default`].
  #[serde(default)]
  pub selector: String,
  pub expected: ScheduleTimes,
}

impl ScheduleEntry {
  pub fn new(kind: ScheduleKind, selector: &str, expected: ScheduleTimes) -> Self {
    Self { kind, selector: selector.to_string(), expected }
  }
}

/// The default schedule table of the sample deployment. Used when the
/// configuration does not provide one.
pub fn builtin_schedules() -> Vec<ScheduleEntry> {
  vec![
    ScheduleEntry::new(
      ScheduleKind::User,
      "129",
      ScheduleTimes::split("08:30", "12:30", "15:30", "19:00"),
    ),
    ScheduleEntry::new(
      ScheduleKind::Department,
      "ADMINISTRACION",
      ScheduleTimes::split("08:30", "13:00", "14:00", "18:00"),
    ),
    ScheduleEntry::new(
      ScheduleKind::Department,
      "TALLER",
      ScheduleTimes::split("09:00", "12:30", "15:00", "19:00"),
    ),
    ScheduleEntry::new(
      ScheduleKind::Default,
      "DEFAULT",
      ScheduleTimes::single("08:30", "18:00"),
    ),
  ]
}

// ─── Compiled schedule ───────────────────────────────────────────────────────

/// Validated expected clock times for one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedTimes {
  pub entrance1: NaiveTime,
  pub exit1:     NaiveTime,
  pub entrance2: Option<NaiveTime>,
  pub exit2:     Option<NaiveTime>,
}

impl ExpectedTimes {
  /// The expected end-of-day exit: `exit2`, or `exit1` for single-span
  /// schedules.
  pub fn end_of_day(&self) -> NaiveTime { self.exit2.unwrap_or(self.exit1) }

  fn compile(selector: &str, times: &ScheduleTimes) -> Result<Self> {
    let required = |field: &'static str, value: &str| {
      parse_clock(value).ok_or_else(|| Error::InvalidTime {
        selector: selector.to_string(),
        field,
        value: value.to_string(),
      })
    };
    let optional = |field: &'static str, value: &Option<String>| {
      value.as_deref().map(|v| required(field, v)).transpose()
    };

    let expected = Self {
      entrance1: required("entrance1", &times.entrance1)?,
      exit1:     required("exit1", &times.exit1)?,
      entrance2: optional("entrance2", &times.entrance2)?,
      exit2:     optional("exit2", &times.exit2)?,
    };
    if expected.entrance2.is_some() != expected.exit2.is_some() {
      return Err(Error::IncompleteAfternoon(selector.to_string()));
    }
    Ok(expected)
  }
}

/// Parse an `HH:MM` clock time.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
  NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Selects the expected schedule for a user: per-user entry first, then
/// per-department entry, then the default.
///
/// Selectors match by exact, case-sensitive string equality. When two entries
/// of the same kind share a selector, the first one in the table wins.
#[derive(Debug, Clone)]
pub struct ScheduleResolver {
  users:       HashMap<String, ExpectedTimes>,
  departments: HashMap<String, ExpectedTimes>,
  default:     ExpectedTimes,
}

impl ScheduleResolver {
  /// Validate `entries` and build a resolver.
  ///
  /// Fails if there is not exactly one default entry, if any time is not a
  /// valid `HH:MM`, or if an entry sets only half of the afternoon span.
  pub fn new(entries: impl IntoIterator<Item = ScheduleEntry>) -> Result<Self> {
    let mut users = HashMap::new();
    let mut departments = HashMap::new();
    let mut defaults = Vec::new();

    for entry in entries {
      let expected = ExpectedTimes::compile(&entry.selector, &entry.expected)?;
      match entry.kind {
        ScheduleKind::User => {
          users.entry(entry.selector).or_insert(expected);
        }
        ScheduleKind::Department => {
          departments.entry(entry.selector).or_insert(expected);
        }
        ScheduleKind::Default => defaults.push(expected),
      }
    }

    let default = match defaults.as_slice() {
      [] => return Err(Error::MissingDefaultSchedule),
      [only] => *only,
      many => return Err(Error::DuplicateDefaultSchedule(many.len())),
    };

    tracing::debug!(
      users = users.len(),
      departments = departments.len(),
      "schedule table loaded"
    );
    Ok(Self { users, departments, default })
  }

  /// The expected times for `user_id` in `department`.
  pub fn resolve(&self, user_id: &str, department: &str) -> &ExpectedTimes {
    self.resolve_with_kind(user_id, department).1
  }

  /// Like [`resolve`](Self::resolve), also reporting which kind of entry
  /// matched.
  pub fn resolve_with_kind(
    &self,
    user_id: &str,
    department: &str,
  ) -> (ScheduleKind, &ExpectedTimes) {
    if let Some(expected) = self.users.get(user_id) {
      (ScheduleKind::User, expected)
    } else if let Some(expected) = self.departments.get(department) {
      (ScheduleKind::Department, expected)
    } else {
      (ScheduleKind::Default, &self.default)
    }
  }
}
