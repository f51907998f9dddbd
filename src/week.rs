// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Custom week numbering, the date -> WeekId index, and the rolling 3-week window anchored at today
// role: engine/windowing
// inputs: Built Calendar, today's date, AllocationPolicy (daily hours, lower-limit ratio)
// outputs: WeekId per date; exactly three WeekWindow values ordered current/next/next-next
// invariants:
// - Week numbers use the day-count formula ((month-1)*31 + day - 1) / 7 + 1, not ISO weeks
// - Dec 31 that is not a Friday belongs to week 1 of the following year
// - Window ids keep today's year digit and step the number by +0, +1, +2
// - workday_count equals the number of non-holiday days in each window
// errors: WeekNotFound when today is not in the calendar; EmptyWeek when a window id has no dates
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::allocate::AllocationPolicy;
use crate::calendar::Calendar;
use crate::error::{EngineError, Result};
use crate::model::{CalendarDay, WeekWindow, WeekdaySymbol};
use crate::util::{format_yyyymmdd, round1};

pub const WINDOW_WEEKS: usize = 3;

/// Reporting week: last digit of the year plus a week number starting at 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekId {
  pub year_digit: u8,
  pub number: u32,
}

impl WeekId {
  pub fn new(year: i32, number: u32) -> Self {
    Self { year_digit: year.rem_euclid(10) as u8, number }
  }

  pub fn offset(self, weeks: u32) -> Self {
    Self { year_digit: self.year_digit, number: self.number + weeks }
  }
}

impl fmt::Display for WeekId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{:02}", self.year_digit, self.number)
  }
}

/// Approximate week number of a date; every month is treated as 31 days long.
pub fn raw_week_number(date: NaiveDate) -> u32 {
  let (month, day) = (date.month(), date.day());
  if month == 1 && day <= 6 {
    return 1;
  }
  ((month - 1) * 31 + day - 1) / 7 + 1
}

pub fn week_id_for(day: &CalendarDay) -> WeekId {
  let date = day.date;
  if date.month() == 12 && date.day() == 31 && day.weekday != WeekdaySymbol::Fri {
    return WeekId::new(date.year() + 1, 1);
  }
  WeekId::new(date.year(), raw_week_number(date))
}

/// Date -> WeekId map over a whole calendar.
#[derive(Debug, Clone, Default)]
pub struct WeekIndex {
  by_date: BTreeMap<NaiveDate, WeekId>,
}

impl WeekIndex {
  pub fn build(calendar: &Calendar) -> Self {
    let by_date = calendar.days().map(|d| (d.date, week_id_for(d))).collect();
    Self { by_date }
  }

  pub fn week_of(&self, date: NaiveDate) -> Option<WeekId> {
    self.by_date.get(&date).copied()
  }

  /// Dates carrying `id`, ascending.
  pub fn dates_of(&self, id: WeekId) -> Vec<NaiveDate> {
    self
      .by_date
      .iter()
      .filter(|(_, w)| **w == id)
      .map(|(d, _)| *d)
      .collect()
  }

  /// The current week and the two following, anchored at `today`.
  pub fn current_week_ids(&self, today: NaiveDate) -> Result<[WeekId; WINDOW_WEEKS]> {
    let current = self
      .week_of(today)
      .ok_or_else(|| EngineError::WeekNotFound { today: format_yyyymmdd(today) })?;
    Ok([current, current.offset(1), current.offset(2)])
  }
}

/// Build the date range, workday count and capacity bounds for each window id.
pub fn build_week_windows(
  calendar: &Calendar,
  index: &WeekIndex,
  ids: &[WeekId; WINDOW_WEEKS],
  policy: &AllocationPolicy,
) -> Result<Vec<WeekWindow>> {
  let mut windows = Vec::with_capacity(WINDOW_WEEKS);

  for (i, id) in ids.iter().enumerate() {
    let dates = index.dates_of(*id);
    let (start_date, end_date) = match (dates.first(), dates.last()) {
      (Some(s), Some(e)) => (*s, *e),
      _ => return Err(EngineError::EmptyWeek { week_id: id.to_string() }),
    };

    let workday_count = dates
      .iter()
      .filter(|d| calendar.is_holiday(**d) == Some(false))
      .count();
    let capacity = workday_count as f64 * policy.full_day_hours;

    let window = WeekWindow {
      label: format!("week_{}", i + 1),
      week_id: id.to_string(),
      start_date,
      end_date,
      workday_count,
      upper_limit_hours: round1(capacity),
      lower_limit_hours: round1(capacity * policy.lower_limit_ratio),
    };
    debug!(
      week = %window.week_id,
      start = %format_yyyymmdd(start_date),
      end = %format_yyyymmdd(end_date),
      workdays = workday_count,
      "week window"
    );
    windows.push(window);
  }

  Ok(windows)
}

/// First and last date covered by the windows, if any.
pub fn window_span(windows: &[WeekWindow]) -> Option<(NaiveDate, NaiveDate)> {
  Some((windows.first()?.start_date, windows.last()?.end_date))
}
