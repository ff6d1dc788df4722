//! Runtime settings, layered from an optional TOML file and `PUNCHCARD_*`
//! environment variables.
//!
//! ```toml
//! language = "es"
//! order    = "chronological"
//!
//! [[schedules]]
//! kind     = "department"
//! selector = "TALLER"
//! expected = { entrance1 = "09:00", exit1 = "12:30", entrance2 = "15:00", exit2 = "19:00" }
//!
//! [[schedules]]
//! kind     = "default"
//! expected = { entrance1 = "08:30", exit1 = "18:00" }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use punchcard_core::{
  deviation::Language,
  pipeline::PunchOrder,
  schedule::{ScheduleEntry, builtin_schedules},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
  #[serde(default)]
  pub language:  Language,
  #[serde(default)]
  pub order:     PunchOrder,
  #[serde(default)]
  pub output:    Option<PathBuf>,
  /// Schedule table. Falls back to the built-in table when absent.
  #[serde(default = "builtin_schedules")]
  pub schedules: Vec<ScheduleEntry>,
}

impl Settings {
  /// Load settings from `path` (which need not exist) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PUNCHCARD"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use punchcard_core::schedule::{ScheduleKind, ScheduleResolver};

  use super::*;

  fn write_config(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
  }

  #[test]
  fn missing_file_uses_defaults() {
    let settings = Settings::load(Path::new("/nonexistent/punchcard.toml")).unwrap();
    assert_eq!(settings.order, PunchOrder::AsGiven);
    assert_eq!(settings.schedules, builtin_schedules());
    assert!(ScheduleResolver::new(settings.schedules).is_ok());
  }

  #[test]
  fn reads_schedule_table() {
    let file = write_config(
      r#"
language = "es"
order = "chronological"
output = "report.csv"

[[schedules]]
kind = "grupo"
selector = "TALLER"
expected = { entrance1 = "09:00", exit1 = "12:30", entrance2 = "15:00", exit2 = "19:00" }

[[schedules]]
kind = "default"
expected = { entrance1 = "08:30", exit1 = "18:00" }
"#,
    );

    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.language, Language::Es);
    assert_eq!(settings.order, PunchOrder::Chronological);
    assert_eq!(settings.output, Some(PathBuf::from("report.csv")));
    assert_eq!(settings.schedules.len(), 2);
    assert_eq!(settings.schedules[0].kind, ScheduleKind::Department);
    assert_eq!(settings.schedules[0].selector, "TALLER");
    assert_eq!(settings.schedules[1].expected.exit2, None);

    let resolver = ScheduleResolver::new(settings.schedules).unwrap();
    assert_eq!(resolver.resolve("1", "TALLER").entrance1.to_string(), "09:00:00");
  }

  #[test]
  fn table_without_default_fails_validation() {
    let file = write_config(
      r#"
[[schedules]]
kind = "user"
selector = "129"
expected = { entrance1 = "08:30", exit1 = "12:30" }
"#,
    );
    let settings = Settings::load(file.path()).unwrap();
    assert!(ScheduleResolver::new(settings.schedules).is_err());
  }
}
