//! `punchcard` — attendance deviation report from a timeclock export.
//!
//! Reads the punches of a CSV or XLSX export, reconstructs each employee's
//! daily clock events and writes them with their deviations to a CSV file.
//!
//! # Usage
//!
//! ```text
//! punchcard punches.xlsx
//! punchcard punches.csv --output report.csv --config punchcard.toml --language es
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use punchcard_core::{
  deviation::Language,
  pipeline::{Pipeline, PipelineOptions, PunchOrder},
  schedule::ScheduleResolver,
};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Output file used when neither the command line nor the config names one.
const DEFAULT_OUTPUT: &str = "processed_file.csv";

#[derive(Parser, Debug)]
#[command(name = "punchcard", author, version, about = "Attendance deviations from timeclock punches")]
struct Cli {
  /// Timeclock export to process (.csv, .xlsx or .xls).
  input: PathBuf,

  /// Where to write the processed sheet (default: processed_file.csv).
  #[arg(short, long, value_name = "FILE")]
  output: Option<PathBuf>,

  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "punchcard.toml", env = "PUNCHCARD_CONFIG")]
  config: PathBuf,

  /// Sort punches by timestamp before deduplicating.
  #[arg(long)]
  sort: bool,

  /// Language of the deviation text: `en` or `es`.
  #[arg(long, value_parser = parse_language)]
  language: Option<Language>,
}

fn parse_language(value: &str) -> Result<Language, String> {
  match value.to_ascii_lowercase().as_str() {
    "en" | "english" => Ok(Language::En),
    "es" | "spanish" => Ok(Language::Es),
    other => Err(format!("unknown language {other:?} (expected en or es)")),
  }
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if cli.sort {
    settings.order = PunchOrder::Chronological;
  }
  if let Some(language) = cli.language {
    settings.language = language;
  }
  let output = cli
    .output
    .or_else(|| settings.output.clone())
    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

  // The schedule table is validated before any input is touched.
  let resolver =
    ScheduleResolver::new(settings.schedules).context("invalid schedule table")?;
  let pipeline = Pipeline::new(resolver, PipelineOptions { order: settings.order });

  let records = punchcard_sheet::read_records(&cli.input)
    .with_context(|| format!("failed to read {}", cli.input.display()))?;
  let result = pipeline.run(&records);
  let rows = result.rows(settings.language);

  punchcard_sheet::write_records(&output, &rows)
    .with_context(|| format!("failed to write {}", output.display()))?;

  tracing::info!(output = %output.display(), rows = rows.len(), "wrote processed sheet");
  Ok(())
}
