//! Suppression of repeated punches within the same 10-minute bucket.

use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use crate::punch::PunchRecord;

/// Width of a deduplication bucket, in minutes.
pub const BUCKET_MINUTES: u32 = 10;

/// Floor `timestamp` to its 10-minute bucket (seconds and sub-seconds zeroed).
pub fn bucket_of(timestamp: NaiveDateTime) -> NaiveDateTime {
  let minute = timestamp.minute() - timestamp.minute() % BUCKET_MINUTES;
  timestamp
    .with_minute(minute)
    .and_then(|t| t.with_second(0))
    .and_then(|t| t.with_nanosecond(0))
    .unwrap_or(timestamp)
}

/// Stateful filter that keeps the first punch of each user per bucket.
///
/// A punch is accepted when its bucket is at least [`BUCKET_MINUTES`] after
/// the bucket of the user's last accepted punch. Input order is taken as
/// given; a bucket earlier than the last accepted one is discarded.
#[derive(Debug, Default)]
pub struct Deduplicator {
  last_bucket: HashMap<String, NaiveDateTime>,
  suppressed:  usize,
}

impl Deduplicator {
  pub fn new() -> Self { Self::default() }

  /// Decide whether `punch` is kept, updating the user's last bucket if so.
  pub fn accept(&mut self, punch: &PunchRecord) -> bool {
    if punch.user_id.trim().is_empty() {
      tracing::debug!(?punch, "dropping punch without user id");
      return false;
    }

    let bucket = bucket_of(punch.timestamp);
    let fresh = match self.last_bucket.get(&punch.user_id) {
      None => true,
      Some(last) => bucket - *last >= TimeDelta::minutes(i64::from(BUCKET_MINUTES)),
    };

    if fresh {
      self.last_bucket.insert(punch.user_id.clone(), bucket);
    } else {
      self.suppressed += 1;
      tracing::debug!(
        user_id = %punch.user_id,
        timestamp = %punch.timestamp,
        "suppressing repeated punch"
      );
    }
    fresh
  }

  /// Number of punches discarded as repeats so far.
  pub fn suppressed(&self) -> usize { self.suppressed }
}

/// Keep the first punch of each user per 10-minute bucket, preserving order.
pub fn dedupe(punches: impl IntoIterator<Item = PunchRecord>) -> Vec<PunchRecord> {
  let mut dedup = Deduplicator::new();
  punches.into_iter().filter(|p| dedup.accept(p)).collect()
}
