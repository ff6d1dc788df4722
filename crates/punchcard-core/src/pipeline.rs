//! The reconciliation pipeline: decode → order → dedupe → reconstruct →
//! resolve and annotate.
//!
//! Each [`Pipeline::run`] owns its own deduplication and day maps, so one
//! pipeline can serve any number of independent batches.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::{
  day::DayRecord,
  dedup::Deduplicator,
  deviation::{self, Language},
  punch::PunchRecord,
  reconstruct::EventReconstructor,
  record::{self, FlatRecord, OutputRow},
  schedule::{ScheduleKind, ScheduleResolver},
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// How input punches are ordered before deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchOrder {
  /// Trust the source to be chronological (timeclock exports are).
  #[default]
  AsGiven,
  /// Stable-sort punches by timestamp first.
  Chronological,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
  pub order: PunchOrder,
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
  pub records_read:     usize,
  /// Rows dropped for a missing user id or date-time.
  pub malformed:        usize,
  /// Punches suppressed as repeats within a 10-minute bucket.
  pub duplicates:       usize,
  /// Punches ignored because their day already had four.
  pub overflow:         usize,
  pub days:             usize,
  /// Days with neither a per-user nor a per-department schedule.
  pub default_schedule: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
  pub days:    Vec<DayRecord>,
  pub summary: RunSummary,
}

impl PipelineOutput {
  /// Output rows in day-record order.
  pub fn rows(&self, language: Language) -> Vec<OutputRow> {
    self
      .days
      .iter()
      .map(|day| OutputRow::from_day(day, language))
      .collect()
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Pipeline {
  resolver: ScheduleResolver,
  options:  PipelineOptions,
}

impl Pipeline {
  pub fn new(resolver: ScheduleResolver, options: PipelineOptions) -> Self {
    Self { resolver, options }
  }

  /// Process a batch of flat input rows. Rows without a user id or a
  /// parseable date-time are dropped and counted.
  pub fn run<I>(&self, records: I) -> PipelineOutput
  where
    I: IntoIterator,
    I::Item: Borrow<FlatRecord>,
  {
    let mut summary = RunSummary::default();
    let mut punches = Vec::new();

    for (row, flat) in records.into_iter().enumerate() {
      summary.records_read += 1;
      match record::decode_punch(flat.borrow()) {
        Ok(punch) => punches.push(punch),
        Err(e) => {
          summary.malformed += 1;
          tracing::debug!(row, error = %e, "dropping malformed record");
        }
      }
    }

    self.process(punches, summary)
  }

  /// Process a batch of already-decoded punches.
  pub fn run_punches(&self, punches: Vec<PunchRecord>) -> PipelineOutput {
    let summary = RunSummary { records_read: punches.len(), ..RunSummary::default() };
    self.process(punches, summary)
  }

  fn process(&self, mut punches: Vec<PunchRecord>, mut summary: RunSummary) -> PipelineOutput {
    let before = punches.len();
    punches.retain(|p| !p.user_id.trim().is_empty());
    if punches.len() < before {
      tracing::debug!(dropped = before - punches.len(), "dropping punches without user id");
    }
    summary.malformed += before - punches.len();

    if self.options.order == PunchOrder::Chronological {
      punches.sort_by_key(|p| p.timestamp);
    }

    let mut dedup = Deduplicator::new();
    let mut reconstructor = EventReconstructor::new();
    for punch in punches.iter().filter(|p| dedup.accept(p)) {
      reconstructor.push(punch);
    }
    summary.duplicates = dedup.suppressed();
    summary.overflow = reconstructor.overflow();

    let days: Vec<DayRecord> = reconstructor
      .finish()
      .into_iter()
      .map(|day| {
        let (kind, expected) = self.resolver.resolve_with_kind(&day.user_id, &day.department);
        if kind == ScheduleKind::Default {
          summary.default_schedule += 1;
          tracing::warn!(
            user_id = %day.user_id,
            department = %day.department,
            date = %day.date,
            "no user or department schedule; using the default"
          );
        }
        deviation::annotate(day, expected)
      })
      .collect();
    summary.days = days.len();

    tracing::info!(
      records = summary.records_read,
      malformed = summary.malformed,
      duplicates = summary.duplicates,
      overflow = summary.overflow,
      days = summary.days,
      default_schedule = summary.default_schedule,
      "attendance batch processed"
    );
    PipelineOutput { days, summary }
  }
}
