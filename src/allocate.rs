// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Spread one task's man-hours over its workdays and over the 3-week window, with the staleness cutoff
// role: engine/allocation
// inputs: Task, built Calendar, three WeekWindow values, today, AllocationPolicy
// outputs: AllocationRecord per substantive task (None for placeholder tasks)
// invariants:
// - Tasks at or below min_man_hours are excluded entirely
// - allocated_hours[i] >= 0; days outside the window span are never allocated
// - A task resolved more than grace_days before today allocates [0, 0, 0]
// - Bad resolution timestamps are logged and ignored, never fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::calendar::Calendar;
use crate::model::{AllocationRecord, Task, WeekWindow};
use crate::util::round1;
use crate::week::WINDOW_WEEKS;

/// Capacity and allocation knobs. Defaults match the standard policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationPolicy {
  /// Standard full-time hours per workday.
  pub full_day_hours: f64,
  /// Lower capacity bound as a share of the upper bound.
  pub lower_limit_ratio: f64,
  /// Days after resolution during which a closed task still counts.
  pub grace_days: u32,
  /// Tasks with man-hours at or below this are placeholders.
  pub min_man_hours: f64,
}

impl Default for AllocationPolicy {
  fn default() -> Self {
    Self {
      full_day_hours: 8.0,
      lower_limit_ratio: 0.6,
      grace_days: 14,
      min_man_hours: 0.1,
    }
  }
}

/// Man-hours of a task if it is substantive under `policy`. Missing man-hours count as zero.
pub fn substantive_hours(task: &Task, policy: &AllocationPolicy) -> Option<f64> {
  let hours = task.man_hours.unwrap_or(0.0);
  if hours <= policy.min_man_hours {
    return None;
  }
  Some(hours)
}

/// Calendar date of a resolution timestamp, in the timestamp's own offset.
pub fn parse_resolution_date(raw: &str) -> Option<NaiveDate> {
  let s = raw.trim();

  if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
    return Some(dt.date_naive());
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.date_naive());
  }
  if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(ndt.date());
  }
  None
}

/// Whether a resolved task has aged past its grace period as of `today`.
pub fn is_stale(task: &Task, today: NaiveDate, grace_days: u32) -> bool {
  let Some(raw) = task.resolution.as_deref() else {
    return false;
  };

  let Some(resolved) = parse_resolution_date(raw) else {
    warn!(task = %task.id, resolution = raw, "unparseable resolution timestamp; no cutoff applied");
    return false;
  };

  match resolved.checked_add_signed(Duration::days(i64::from(grace_days))) {
    Some(cutoff) => cutoff < today,
    None => false,
  }
}

/// Allocate a task over the window. Returns `None` for placeholder tasks.
pub fn allocate_task(
  task: &Task,
  calendar: &Calendar,
  windows: &[WeekWindow],
  today: NaiveDate,
  policy: &AllocationPolicy,
) -> Option<AllocationRecord> {
  let man_hours = substantive_hours(task, policy)?;

  let valid = match (task.start_date, task.end_date) {
    (Some(start), Some(end)) => calendar.workdays_between(start, end),
    _ => Vec::new(),
  };
  let span = valid.len();

  let per_workday_hours = if span > 0 { round1(man_hours / span as f64) } else { 0.0 };

  let mut workdays_in_week = [0usize; WINDOW_WEEKS];
  let mut allocated_hours = [0.0f64; WINDOW_WEEKS];

  for (i, window) in windows.iter().take(WINDOW_WEEKS).enumerate() {
    workdays_in_week[i] = valid.iter().filter(|d| window.contains(**d)).count();
    if span > 0 {
      allocated_hours[i] = round1(man_hours / span as f64 * workdays_in_week[i] as f64);
    }
  }

  if is_stale(task, today, policy.grace_days) {
    debug!(task = %task.id, status = ?task.status, "resolved past grace period; hours zeroed");
    allocated_hours = [0.0; WINDOW_WEEKS];
  }

  Some(AllocationRecord {
    per_workday_hours,
    workday_count_in_span: span,
    workdays_in_week,
    allocated_hours,
  })
}
