//! Reconstruction of per-user-day clock events from deduplicated punches.

use std::collections::HashMap;

use crate::{
  day::{DayKey, DayRecord, Slot},
  punch::PunchRecord,
};

/// Groups punches by `(date, user_id)` and fills each day's slots in order of
/// appearance.
///
/// Day records are emitted in the order they were first created. A punch
/// arriving after all four slots of its day are filled is ignored.
#[derive(Debug, Default)]
pub struct EventReconstructor {
  days:     Vec<DayRecord>,
  index:    HashMap<DayKey, usize>,
  overflow: usize,
}

impl EventReconstructor {
  pub fn new() -> Self { Self::default() }

  /// Record `punch` in its day, creating the day on first sight. Returns the
  /// filled slot, or `None` if the day was already full.
  pub fn push(&mut self, punch: &PunchRecord) -> Option<Slot> {
    let key = DayKey { date: punch.date(), user_id: punch.user_id.clone() };
    let idx = match self.index.get(&key) {
      Some(&idx) => idx,
      None => {
        self.days.push(DayRecord::for_punch(punch));
        self.index.insert(key, self.days.len() - 1);
        self.days.len() - 1
      }
    };

    let slot = self.days[idx].record(punch.clock_time());
    if slot.is_none() {
      self.overflow += 1;
      tracing::debug!(
        user_id = %punch.user_id,
        timestamp = %punch.timestamp,
        "day already has four punches; ignoring"
      );
    }
    slot
  }

  /// Number of punches ignored because their day was full.
  pub fn overflow(&self) -> usize { self.overflow }

  pub fn finish(self) -> Vec<DayRecord> { self.days }
}

/// Reconstruct day records from `punches`, in first-seen order.
pub fn reconstruct<'a>(punches: impl IntoIterator<Item = &'a PunchRecord>) -> Vec<DayRecord> {
  let mut reconstructor = EventReconstructor::new();
  for punch in punches {
    reconstructor.push(punch);
  }
  reconstructor.finish()
}
