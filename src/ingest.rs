// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Read calendar and task snapshots from disk and normalize them into engine types
// role: io/ingestion
// inputs: {dir}/{year}.json calendar files; a task file (normalized array or raw Jira search payload)
// outputs: Built Calendar (with December lookahead), Vec<Task> with the "NA" sentinel mapped to None
// side_effects: Reads files; save_calendar writes {year}_modify.json
// invariants:
// - The engine never sees "NA", empty strings, or dashed dates
// - Resolution timestamps without a 'T' separator are treated as absent
// - Duplicate task ids keep the first occurrence
// errors: IO/JSON errors carry the file path; structural problems surface as EngineError::DataIntegrity
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::calendar::{build_calendar, Calendar};
use crate::error::EngineError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{CalendarDay, RawCalendarDay, Task, TaskRecord};
use crate::util::{parse_yyyymmdd, strip_date_separators};

const NA: &str = "NA";

/// Field ids of the Jira instance the raw search payload comes from.
#[derive(Debug, Clone)]
pub struct JiraFields {
  pub target_start: &'static str,
  pub target_end: &'static str,
  pub man_hours: &'static str,
}

impl Default for JiraFields {
  fn default() -> Self {
    Self {
      target_start: "customfield_10109",
      target_end: "customfield_10110",
      man_hours: "customfield_12046",
    }
  }
}

pub fn calendar_path(dir: &Path, year: i32) -> PathBuf {
  dir.join(format!("{year}.json"))
}

pub fn modified_calendar_path(dir: &Path, year: i32) -> PathBuf {
  dir.join(format!("{year}_modify.json"))
}

pub fn read_raw_calendar(path: &Path) -> Result<Vec<RawCalendarDay>> {
  let data = std::fs::read(path).with_context(|| format!("reading calendar {}", path.display()))?;
  let raw: Vec<RawCalendarDay> =
    serde_json::from_slice(&data).with_context(|| format!("parsing calendar {}", path.display()))?;
  Ok(raw)
}

/// Load and build the calendar for `year`. In December the next year's file is merged in when present.
pub fn load_calendar(dir: &Path, year: i32, today: NaiveDate) -> Result<Calendar> {
  let path = calendar_path(dir, year);
  let raw = read_raw_calendar(&path)?;
  let mut calendar =
    build_calendar(year, &raw).with_context(|| format!("building calendar from {}", path.display()))?;
  info!(year, days = calendar.len(), path = %path.display(), "calendar loaded");

  if today.month() == 12 {
    let next_path = calendar_path(dir, year + 1);
    if next_path.exists() {
      let next_raw = read_raw_calendar(&next_path)?;
      let next = build_calendar(year + 1, &next_raw)
        .with_context(|| format!("building calendar from {}", next_path.display()))?;
      calendar = calendar.merge(next)?;
      info!(year = year + 1, path = %next_path.display(), "next year's calendar merged");
    } else {
      warn!(
        path = %next_path.display(),
        "December run without next year's calendar; tasks reaching into January count no workdays there"
      );
    }
  }

  Ok(calendar)
}

/// Write the overridden calendar for `year` as `{year}_modify.json` next to the source file.
pub fn save_calendar(dir: &Path, year: i32, calendar: &Calendar) -> Result<PathBuf> {
  let days: Vec<&CalendarDay> = calendar.days().filter(|d| d.date.year() == year).collect();
  let path = modified_calendar_path(dir, year);
  std::fs::write(&path, serde_json::to_vec_pretty(&days)?)
    .with_context(|| format!("writing calendar {}", path.display()))?;
  Ok(path)
}

/// String field with the `"NA"` sentinel, null and blank mapped to `None`.
pub fn na_string(v: &serde_json::Value) -> Option<String> {
  match v {
    serde_json::Value::String(s) => {
      let t = s.trim();
      if t.is_empty() || t == NA {
        None
      } else {
        Some(t.to_string())
      }
    }
    serde_json::Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

/// Numeric field that may arrive as a number, a numeric string, or `"NA"`.
pub fn na_number(v: &serde_json::Value) -> Option<f64> {
  let n = match v {
    serde_json::Value::Number(n) => n.as_f64(),
    serde_json::Value::String(_) => na_string(v).and_then(|s| s.parse::<f64>().ok()),
    _ => None,
  };
  n.filter(|x| x.is_finite())
}

fn na_date(task_id: &str, field: &str, v: &serde_json::Value) -> Option<NaiveDate> {
  let raw = na_string(v)?;
  let parsed = parse_yyyymmdd(&strip_date_separators(&raw));
  if parsed.is_none() {
    warn!(task = task_id, field, value = %raw, "unparseable task date; treated as missing");
  }
  parsed
}

fn na_resolution(v: &serde_json::Value) -> Option<String> {
  na_string(v).filter(|s| s.contains('T'))
}

fn task_from_record(rec: TaskRecord) -> Task {
  let id = rec.issue.trim().to_string();
  Task {
    start_date: na_date(&id, "Target Start", &rec.target_start),
    end_date: na_date(&id, "Target End", &rec.target_end),
    issue_type: na_string(&rec.issue_type),
    name: na_string(&rec.summary).unwrap_or_default(),
    status: na_string(&rec.status),
    assignee: na_string(&rec.assignee),
    parent_id: na_string(&rec.parent),
    man_hours: na_number(&rec.man_hour),
    resolution: na_resolution(&rec.resolution_date),
    id,
  }
}

fn task_from_jira_issue(issue: &serde_json::Value, fields: &JiraFields) -> Result<Task, EngineError> {
  let id = issue
    .fetch("key")
    .to::<String>()
    .map(|k| k.trim().to_string())
    .filter(|k| !k.is_empty())
    .ok_or_else(|| EngineError::integrity("Jira issue without a key"))?;

  if !issue.fetch("fields").is_present() {
    warn!(task = %id, "Jira issue has no fields; every attribute treated as missing");
  }

  let field = |path: &str| -> serde_json::Value {
    issue.fetch(&format!("fields.{path}")).to_or_default::<serde_json::Value>()
  };

  Ok(Task {
    start_date: na_date(&id, "target start", &field(fields.target_start)),
    end_date: na_date(&id, "target end", &field(fields.target_end)),
    issue_type: na_string(&field("issuetype.name")),
    name: na_string(&field("summary")).unwrap_or_default(),
    status: na_string(&field("status.name")),
    assignee: na_string(&field("assignee.displayName")),
    parent_id: na_string(&field("parent.key")),
    man_hours: na_number(&field(fields.man_hours)),
    resolution: na_resolution(&field("resolutiondate")),
    id,
  })
}

/// Accepts a normalized task array or a raw Jira search response (`{"issues": [...]}`).
pub fn tasks_from_value(value: &serde_json::Value) -> Result<Vec<Task>> {
  let tasks: Vec<Task> = if value.is_array() {
    let records: Vec<TaskRecord> =
      serde_json::from_value(value.clone()).context("task records must carry an \"Issue\" id")?;
    records.into_iter().map(task_from_record).collect()
  } else if let Some(issues) = value.get("issues").and_then(|v| v.as_array()) {
    let fields = JiraFields::default();
    issues
      .iter()
      .map(|i| task_from_jira_issue(i, &fields))
      .collect::<Result<Vec<_>, _>>()?
  } else {
    return Err(EngineError::integrity("task snapshot is neither a task array nor a Jira search payload").into());
  };

  Ok(dedupe(tasks))
}

fn dedupe(tasks: Vec<Task>) -> Vec<Task> {
  let mut seen: HashSet<String> = HashSet::new();
  let mut out = Vec::with_capacity(tasks.len());
  for t in tasks {
    if seen.insert(t.id.clone()) {
      out.push(t);
    } else {
      warn!(task = %t.id, "duplicate task id; keeping first occurrence");
    }
  }
  out
}

pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
  let data = std::fs::read(path).with_context(|| format!("reading tasks {}", path.display()))?;
  let value: serde_json::Value =
    serde_json::from_slice(&data).with_context(|| format!("parsing tasks {}", path.display()))?;
  let tasks = tasks_from_value(&value).with_context(|| format!("normalizing tasks {}", path.display()))?;
  debug!(count = tasks.len(), path = %path.display(), "tasks loaded");
  Ok(tasks)
}
