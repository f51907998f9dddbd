// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one report run: load snapshots, build calendar and windows, allocate, aggregate, render
// role: processing/orchestrator
// inputs: EffectiveConfig (paths, today, policy knobs, output format and target)
// outputs: Report JSON or summary text on stdout or in --out; optional {year}_modify.json
// side_effects: Reads calendar/task files; writes the report and, with --save-calendar, the modified calendar
// invariants:
// - Every input is read completely before the engine starts
// - Any fatal error aborts the run before anything is written (report target or modified calendar)
// errors: Engine errors and IO errors are propagated with the failing phase or path as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use tracing::info;

use crate::aggregate::build_report;
use crate::cli::EffectiveConfig;
use crate::ingest::{load_calendar, read_tasks, save_calendar};
use crate::model::WorkhourReport;
use crate::params::build_policy;
use crate::render::{emit, render};
use crate::util::format_yyyymmdd;
use crate::week::{build_week_windows, WeekIndex};

pub fn generate_report(cfg: &EffectiveConfig) -> Result<WorkhourReport> {
  let policy = build_policy(cfg);
  let today = cfg.today;

  let calendar = load_calendar(&cfg.calendar_dir, cfg.year, today)?;
  let tasks = read_tasks(&cfg.tasks)?;

  let index = WeekIndex::build(&calendar);
  let ids = index
    .current_week_ids(today)
    .with_context(|| format!("locating the current week for {}", format_yyyymmdd(today)))?;
  let windows = build_week_windows(&calendar, &index, &ids, &policy).context("building week windows")?;

  if cfg.save_calendar {
    let path = save_calendar(&cfg.calendar_dir, cfg.year, &calendar)?;
    info!(path = %path.display(), "modified calendar saved");
  }

  let report = build_report(&tasks, &calendar, &windows, today, &policy);
  info!(
    today = %format_yyyymmdd(today),
    weeks = %windows.iter().map(|w| w.week_id.as_str()).collect::<Vec<_>>().join(","),
    members = report.members.len(),
    tasks = tasks.len(),
    "report generated"
  );
  Ok(report)
}

pub fn process(cfg: &EffectiveConfig) -> Result<()> {
  let report = generate_report(cfg)?;
  let content = render(&report, cfg.format)?;
  emit(&content, &cfg.out)
}
