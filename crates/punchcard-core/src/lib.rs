//! Core types and the reconciliation pipeline for punchcard.
//!
//! This crate is free of file and spreadsheet dependencies. It consumes flat
//! punch records (named string fields), reduces them to one [`DayRecord`] per
//! user per calendar day, and annotates each clock event with its deviation
//! from the applicable schedule.
//!
//! ```
//! use punchcard_core::{
//!   pipeline::{Pipeline, PipelineOptions},
//!   schedule::{ScheduleResolver, builtin_schedules},
//! };
//!
//! let resolver = ScheduleResolver::new(builtin_schedules()).unwrap();
//! let pipeline = Pipeline::new(resolver, PipelineOptions::default());
//! let output = pipeline.run(Vec::<punchcard_core::record::FlatRecord>::new());
//! assert!(output.days.is_empty());
//! ```

pub mod day;
pub mod dedup;
pub mod deviation;
pub mod error;
pub mod pipeline;
pub mod punch;
pub mod reconstruct;
pub mod record;
pub mod schedule;

pub use day::{DayRecord, Slot, SlotState};
pub use error::{Error, Result};
pub use punch::PunchRecord;

#[cfg(test)]
mod tests;
