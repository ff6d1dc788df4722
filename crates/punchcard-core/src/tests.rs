//! End-to-end tests of the pipeline over flat records.

use crate::{
  day::Slot,
  deviation::{Deviation, Language},
  pipeline::{Pipeline, PipelineOptions, PunchOrder},
  record::{DEPARTMENT, FlatRecord, NAME, TIMESTAMP, USER_ID},
  schedule::{ScheduleEntry, ScheduleKind, ScheduleResolver, ScheduleTimes, builtin_schedules},
};

fn punch(user: &str, dept: &str, when: &str) -> FlatRecord {
  [
    (USER_ID, user),
    (DEPARTMENT, dept),
    (NAME, "Someone"),
    (TIMESTAMP, when),
  ]
  .into_iter()
  .map(|(k, v)| (k.to_string(), v.to_string()))
  .collect()
}

fn pipeline() -> Pipeline {
  let resolver = ScheduleResolver::new(builtin_schedules()).expect("builtin schedules");
  Pipeline::new(resolver, PipelineOptions::default())
}

// ─── Deduplication through the pipeline ──────────────────────────────────────

#[test]
fn five_minute_double_punch_collapses_to_entrance1() {
  let out = pipeline().run(vec![
    punch("7", "VENTAS", "2024-04-01 08:02:00"),
    punch("7", "VENTAS", "2024-04-01 08:07:00"),
  ]);
  assert_eq!(out.days.len(), 1);
  let day = &out.days[0];
  assert_eq!(day.time(Slot::Entrance1).map(|t| t.to_string()).as_deref(), Some("08:02:00"));
  assert_eq!(day.time(Slot::Exit1), None);
  assert_eq!(out.summary.duplicates, 1);
}

#[test]
fn malformed_records_are_dropped_and_counted() {
  let mut no_user = punch("", "VENTAS", "2024-04-01 08:00");
  no_user.remove(USER_ID);
  let out = pipeline().run(vec![
    no_user,
    punch("7", "VENTAS", "not a date"),
    punch("7", "VENTAS", "2024-04-01 08:00"),
  ]);
  assert_eq!(out.summary.records_read, 3);
  assert_eq!(out.summary.malformed, 2);
  assert_eq!(out.days.len(), 1);
}

// ─── Schedules and deviations ────────────────────────────────────────────────

#[test]
fn department_schedule_full_day() {
  let out = pipeline().run(vec![
    punch("5", "ADMINISTRACION", "2024-04-01 08:35"),
    punch("5", "ADMINISTRACION", "2024-04-01 13:00"),
    punch("5", "ADMINISTRACION", "2024-04-01 13:55"),
    punch("5", "ADMINISTRACION", "2024-04-01 18:20"),
  ]);
  let rows = out.rows(Language::En);
  assert_eq!(rows.len(), 1);
  let row = &rows[0];
  assert_eq!(row.entrance1_deviation, "late by 5 minutes");
  assert_eq!(row.exit1_deviation, "on time");
  assert_eq!(row.entrance2_deviation, "early by 5 minutes");
  assert_eq!(row.exit2_deviation, "late by 20 minutes");
}

#[test]
fn per_user_schedule_beats_department() {
  let out = pipeline().run(vec![
    punch("129", "ADMINISTRACION", "2024-04-01 08:30"),
    punch("129", "ADMINISTRACION", "2024-04-01 12:30"),
    punch("129", "ADMINISTRACION", "2024-04-01 15:30"),
    punch("129", "ADMINISTRACION", "2024-04-01 19:00"),
  ]);
  let day = &out.days[0];
  for slot in Slot::ALL {
    assert_eq!(day.deviation(slot), Some(Deviation::OnTime), "{slot:?}");
  }
}

#[test]
fn single_pair_day_uses_end_of_day_exit() {
  let out = pipeline().run(vec![
    punch("5", "ADMINISTRACION", "2024-04-01 08:40"),
    punch("5", "ADMINISTRACION", "2024-04-01 13:00"),
  ]);
  let row = &out.rows(Language::En)[0];
  assert_eq!(row.entrance1_deviation, "late by 10 minutes");
  assert_eq!(row.exit1_deviation, "early by 300 minutes");
  assert_eq!(row.entrance2_deviation, "");
  assert_eq!(row.exit2_deviation, "");
}

#[test]
fn spanish_rows() {
  let out = pipeline().run(vec![punch("5", "TALLER", "2024-04-01 08:50")]);
  let row = &out.rows(Language::Es)[0];
  assert_eq!(row.entrance1_deviation, "temprano por 10 minutos");
}

#[test]
fn overflow_is_counted_not_emitted() {
  let out = pipeline().run(vec![
    punch("5", "TALLER", "2024-04-01 09:00"),
    punch("5", "TALLER", "2024-04-01 12:30"),
    punch("5", "TALLER", "2024-04-01 15:00"),
    punch("5", "TALLER", "2024-04-01 19:00"),
    punch("5", "TALLER", "2024-04-01 21:00"),
  ]);
  assert_eq!(out.summary.overflow, 1);
  assert_eq!(out.days[0].time(Slot::Exit2).map(|t| t.to_string()).as_deref(), Some("19:00:00"));
}

#[test]
fn days_split_at_midnight_by_wall_clock() {
  let out = pipeline().run(vec![
    punch("5", "TALLER", "2024-04-01 23:55"),
    punch("5", "TALLER", "2024-04-02 00:20"),
  ]);
  let dates: Vec<_> = out.days.iter().map(|d| d.date.to_string()).collect();
  assert_eq!(dates, ["2024-04-01", "2024-04-02"]);
}

// ─── Ordering ────────────────────────────────────────────────────────────────

#[test]
fn chronological_option_sorts_before_dedup() {
  let input = vec![
    punch("5", "TALLER", "2024-04-01 13:00"),
    punch("5", "TALLER", "2024-04-01 09:00"),
  ];

  let as_given = pipeline().run(&input);
  assert_eq!(as_given.days[0].time(Slot::Exit1), None);

  let resolver = ScheduleResolver::new(builtin_schedules()).expect("builtin schedules");
  let sorted = Pipeline::new(resolver, PipelineOptions { order: PunchOrder::Chronological })
    .run(&input);
  let row = &sorted.rows(Language::En)[0];
  assert_eq!(row.entrance1, "09:00");
  assert_eq!(row.exit1, "13:00");
}

#[test]
fn runs_do_not_share_state() {
  let p = pipeline();
  let first = p.run(vec![punch("5", "TALLER", "2024-04-01 09:00")]);
  let second = p.run(vec![punch("5", "TALLER", "2024-04-01 09:05")]);
  assert_eq!(first.summary.duplicates, 0);
  assert_eq!(second.summary.duplicates, 0);
  assert_eq!(second.days.len(), 1);
}

#[test]
fn default_schedule_without_afternoon_span() {
  let resolver = ScheduleResolver::new(vec![ScheduleEntry::new(
    ScheduleKind::Default,
    "DEFAULT",
    ScheduleTimes::single("08:30", "18:00"),
  )])
  .expect("single default");
  let out = Pipeline::new(resolver, PipelineOptions::default()).run(vec![
    punch("9", "", "2024-04-01 08:30"),
    punch("9", "", "2024-04-01 13:00"),
    punch("9", "", "2024-04-01 14:00"),
    punch("9", "", "2024-04-01 18:00"),
  ]);
  let row = &out.rows(Language::En)[0];
  assert_eq!(row.entrance2, "14:00");
  assert_eq!(row.entrance2_deviation, "");
  assert_eq!(row.exit2_deviation, "on time");
}

#[test]
fn typed_punches_skip_decoding() {
  use chrono::NaiveDate;

  use crate::punch::PunchRecord;

  let day = NaiveDate::from_ymd_opt(2024, 4, 1).expect("date");
  let punches = vec![
    PunchRecord::new("5", "TALLER", "Ana", day.and_hms_opt(9, 0, 0).expect("time")),
    PunchRecord::new("5", "TALLER", "Ana", day.and_hms_opt(9, 4, 0).expect("time")),
    PunchRecord::new("5", "TALLER", "Ana", day.and_hms_opt(12, 40, 0).expect("time")),
  ];
  let out = pipeline().run_punches(punches);
  assert_eq!(out.summary.records_read, 3);
  assert_eq!(out.summary.malformed, 0);
  assert_eq!(out.summary.duplicates, 1);
  let row = &out.rows(Language::En)[0];
  assert_eq!(row.exit1, "12:40");
  assert_eq!(row.exit1_deviation, "early by 380 minutes");
}

#[test]
fn typed_punches_without_user_count_as_malformed() {
  use chrono::NaiveDate;

  use crate::punch::PunchRecord;

  let at = NaiveDate::from_ymd_opt(2024, 4, 1)
    .expect("date")
    .and_hms_opt(9, 0, 0)
    .expect("time");
  let out = pipeline().run_punches(vec![
    PunchRecord::new("", "TALLER", "Ana", at),
    PunchRecord::new("  ", "TALLER", "Ana", at),
    PunchRecord::new("5", "TALLER", "Ana", at),
  ]);
  let s = out.summary;
  assert_eq!(s.records_read, 3);
  assert_eq!(s.malformed, 2);
  assert_eq!(s.days, 1);
  assert_eq!(s.records_read, s.malformed + s.duplicates + s.overflow + 1);
}

#[test]
fn default_schedule_fallbacks_are_counted() {
  let out = pipeline().run(vec![
    punch("129", "VENTAS", "2024-04-01 08:30"),
    punch("5", "TALLER", "2024-04-01 09:00"),
    punch("6", "VENTAS", "2024-04-01 08:30"),
    punch("7", "taller", "2024-04-01 08:30"),
  ]);
  assert_eq!(out.summary.days, 4);
  assert_eq!(out.summary.default_schedule, 2);
}
