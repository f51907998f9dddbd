// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Serialize the workhour report as pretty JSON or a plain-text capacity summary and deliver it
// role: rendering/output
// inputs: WorkhourReport, OutputFormat, output target ("-" or a file path)
// outputs: Bytes on stdout or in the target file
// side_effects: Writes stdout or one file
// invariants: JSON output is pretty-printed with a trailing newline; summary marks Over/Under member-weeks
// errors: Write errors carry the target path
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::{LoadStatus, WorkhourReport};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  Json,
  Summary,
}

pub fn render_json(report: &WorkhourReport) -> Result<String> {
  let mut s = serde_json::to_string_pretty(report)?;
  s.push('\n');
  Ok(s)
}

fn marker(status: LoadStatus) -> &'static str {
  match status {
    LoadStatus::Over => "+",
    LoadStatus::Under => "-",
    LoadStatus::Within => "",
  }
}

/// Members x weeks table. `+` marks a week over its upper limit, `-` one under its lower limit.
pub fn render_summary(report: &WorkhourReport) -> String {
  let mut out = String::new();
  let name_width = report
    .members
    .iter()
    .map(|m| m.name.chars().count())
    .chain(std::iter::once("member".len()))
    .max()
    .unwrap_or(6);

  let _ = write!(out, "{:<name_width$}", "member");
  for w in &report.week {
    let _ = write!(out, "  {:>10}", format!("{} {}", w.week_id, w.label.replace("week_", "w")));
  }
  out.push('\n');

  let _ = write!(out, "{:<name_width$}", "capacity");
  for w in &report.week {
    let _ = write!(out, "  {:>10}", format!("{:.1}-{:.1}", w.lower_limit_hours, w.upper_limit_hours));
  }
  out.push('\n');

  let (mut over, mut under) = (0usize, 0usize);
  for m in &report.members {
    let _ = write!(out, "{:<name_width$}", m.name);
    for (w, hours) in report.week.iter().zip(m.weekly_totals()) {
      let status = w.classify(hours);
      match status {
        LoadStatus::Over => over += 1,
        LoadStatus::Under => under += 1,
        LoadStatus::Within => {}
      }
      let _ = write!(out, "  {:>10}", format!("{:.1}{}", hours, marker(status)));
    }
    out.push('\n');
  }

  let _ = writeln!(
    out,
    "\n{} members, {} member-weeks over capacity, {} under",
    report.members.len(),
    over,
    under
  );
  out
}

pub fn render(report: &WorkhourReport, format: OutputFormat) -> Result<String> {
  match format {
    OutputFormat::Json => render_json(report),
    OutputFormat::Summary => Ok(render_summary(report)),
  }
}

/// Write to stdout for `-`, otherwise to the file at `out`.
pub fn emit(content: &str, out: &str) -> Result<()> {
  if out == "-" {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(content.as_bytes()).context("writing report to stdout")?;
    lock.flush()?;
    return Ok(());
  }

  let path = Path::new(out);
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }
  std::fs::write(path, content).with_context(|| format!("writing report {}", path.display()))?;
  Ok(())
}
