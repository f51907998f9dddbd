// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build the per-year workday/holiday calendar from raw source records and apply business overrides
// role: engine/calendar
// inputs: Year and raw {date, week, isHoliday} records (already fetched)
// outputs: Calendar (date-ordered, one CalendarDay per date) with workday lookups
// invariants:
// - May 1st, Saturdays and Sundays are always holidays after build
// - One record per date; duplicates and foreign-year dates are integrity errors
// - Pure transform; persisting the built calendar is the caller's concern
// errors: EngineError::DataIntegrity for empty input, missing fields, bad dates/symbols, duplicates
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::model::{CalendarDay, RawCalendarDay, WeekdaySymbol};
use crate::util::parse_yyyymmdd;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calendar {
  days: BTreeMap<NaiveDate, CalendarDay>,
}

impl Calendar {
  pub fn len(&self) -> usize {
    self.days.len()
  }

  /// Days in ascending date order.
  pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
    self.days.values()
  }

  pub fn is_holiday(&self, date: NaiveDate) -> Option<bool> {
    self.days.get(&date).map(|d| d.is_holiday)
  }

  /// Non-holiday dates in `[start, end]`, inclusive. Dates the calendar does not know are not workdays.
  pub fn workdays_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
      return Vec::new();
    }
    self
      .days
      .range(start..=end)
      .filter(|(_, d)| d.is_workday())
      .map(|(date, _)| *date)
      .collect()
  }

  /// Combine two built calendars (e.g. this year and next year's December lookahead).
  pub fn merge(mut self, other: Calendar) -> Result<Calendar> {
    for (date, day) in other.days {
      if self.days.contains_key(&date) {
        return Err(EngineError::integrity(format!(
          "calendar date {} appears in more than one source",
          date.format("%Y%m%d")
        )));
      }
      self.days.insert(date, day);
    }
    Ok(self)
  }
}

pub fn is_labour_day(date: NaiveDate) -> bool {
  date.month() == 5 && date.day() == 1
}

/// Force the business holidays onto a day: May 1st and weekends.
pub fn apply_overrides(day: &mut CalendarDay) {
  if is_labour_day(day.date) || day.weekday.is_weekend() {
    day.is_holiday = true;
  }
}

fn days_in_year(year: i32) -> Option<i64> {
  let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
  let next = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
  Some((next - start).num_days())
}

fn validate_record(year: i32, idx: usize, raw: &RawCalendarDay) -> Result<CalendarDay> {
  let date_raw = raw
    .date
    .as_deref()
    .ok_or_else(|| EngineError::integrity(format!("calendar record #{idx} has no date")))?;

  let date = parse_yyyymmdd(date_raw).ok_or_else(|| {
    EngineError::integrity(format!("calendar record #{idx} has invalid date {date_raw:?}"))
  })?;

  if date.year() != year {
    return Err(EngineError::integrity(format!(
      "calendar record {date_raw} does not belong to year {year}"
    )));
  }

  let symbol_raw = raw
    .week
    .as_deref()
    .ok_or_else(|| EngineError::integrity(format!("calendar record {date_raw} has no weekday symbol")))?;

  let weekday = WeekdaySymbol::parse(symbol_raw).ok_or_else(|| {
    EngineError::integrity(format!("calendar record {date_raw} has unknown weekday symbol {symbol_raw:?}"))
  })?;

  let is_holiday = raw
    .is_holiday
    .ok_or_else(|| EngineError::integrity(format!("calendar record {date_raw} has no isHoliday flag")))?;

  let actual = WeekdaySymbol::from_weekday(date.weekday());
  if actual != weekday {
    warn!(
      date = date_raw,
      source = weekday.symbol(),
      actual = actual.symbol(),
      "calendar weekday symbol disagrees with the date; keeping the source symbol"
    );
  }

  Ok(CalendarDay {
    date,
    weekday,
    is_holiday,
    description: raw.description.clone(),
  })
}

/// Build the calendar for `year` from raw source records, applying overrides.
pub fn build_calendar(year: i32, raw: &[RawCalendarDay]) -> Result<Calendar> {
  if raw.is_empty() {
    return Err(EngineError::integrity(format!("calendar for {year} is empty")));
  }

  let mut days: BTreeMap<NaiveDate, CalendarDay> = BTreeMap::new();

  for (idx, record) in raw.iter().enumerate() {
    let mut day = validate_record(year, idx, record)?;
    apply_overrides(&mut day);

    if days.insert(day.date, day).is_some() {
      return Err(EngineError::integrity(format!(
        "calendar record {} appears more than once",
        record.date.as_deref().unwrap_or_default()
      )));
    }
  }

  if let Some(expected) = days_in_year(year) {
    if days.len() as i64 != expected {
      warn!(year, records = days.len(), expected, "calendar does not cover every day of the year");
    }
  }

  let holidays = days.values().filter(|d| d.is_holiday).count();
  debug!(year, days = days.len(), holidays, "calendar built");

  Ok(Calendar { days })
}
