use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::render::OutputFormat;
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "manpower-report",
    version,
    about = "Allocate task man-hours over a rolling 3-week window and report per-member workload",
    long_about = None
)]
pub struct Cli {
  /// Directory holding the {year}.json holiday calendars
  #[arg(long, default_value = ".")]
  pub calendar_dir: PathBuf,

  /// Task snapshot: normalized task array or raw Jira search response
  #[arg(long, default_value = "Jira_Tasks.json")]
  pub tasks: PathBuf,

  /// Calendar year to load (default: year of today)
  #[arg(long)]
  pub year: Option<i32>,

  /// Output file path (default stdout "-")
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
  pub format: OutputFormat,

  /// Standard working hours per workday
  #[arg(long, default_value_t = 8.0)]
  pub full_day_hours: f64,

  /// Lower capacity bound as a share of the upper bound, 0..=1
  #[arg(long, default_value_t = 0.6)]
  pub lower_limit_ratio: f64,

  /// Days after resolution during which a closed task still counts
  #[arg(long, default_value_t = 14)]
  pub grace_days: u32,

  /// Tasks with man-hours at or below this are ignored
  #[arg(long, default_value_t = 0.1)]
  pub min_man_hours: f64,

  /// Write the overridden calendar as {year}_modify.json next to the source calendar
  #[arg(long)]
  pub save_calendar: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override today's date as YYYYMMDD (hidden; tests only)
  #[arg(long = "today-override", hide = true)]
  pub today_override: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub calendar_dir: PathBuf,
  pub tasks: PathBuf,
  pub year: i32,
  pub today: NaiveDate,
  pub out: String,
  pub format: OutputFormat,
  pub full_day_hours: f64,
  pub lower_limit_ratio: f64,
  pub grace_days: u32,
  pub min_man_hours: f64,
  pub save_calendar: bool,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let today_override = match cli.today_override.as_deref() {
    Some(raw) => match util::parse_yyyymmdd(&util::strip_date_separators(raw)) {
      Some(d) => Some(d),
      None => bail!("--today-override expects a YYYYMMDD date, got {raw:?}"),
    },
    None => None,
  };
  let today = util::effective_today(today_override);

  if !cli.full_day_hours.is_finite() || cli.full_day_hours <= 0.0 {
    bail!("--full-day-hours must be greater than 0, got {}", cli.full_day_hours);
  }
  if !(0.0..=1.0).contains(&cli.lower_limit_ratio) {
    bail!("--lower-limit-ratio must be within [0, 1], got {}", cli.lower_limit_ratio);
  }
  if !cli.min_man_hours.is_finite() || cli.min_man_hours < 0.0 {
    bail!("--min-man-hours must not be negative, got {}", cli.min_man_hours);
  }

  Ok(EffectiveConfig {
    calendar_dir: cli.calendar_dir,
    tasks: cli.tasks,
    year: cli.year.unwrap_or_else(|| today.year()),
    today,
    out: cli.out,
    format: cli.format,
    full_day_hours: cli.full_day_hours,
    lower_limit_ratio: cli.lower_limit_ratio,
    grace_days: cli.grace_days,
    min_man_hours: cli.min_man_hours,
    save_calendar: cli.save_calendar,
  })
}
