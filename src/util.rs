// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for decimal rounding, YYYYMMDD dates, the effective "today", and man page rendering
// role: utilities/helpers
// inputs: f64 hour values; date strings; optional today override; clap CommandFactory
// outputs: Rounded hours, parsed dates, man page text
// invariants:
// - round1 is round-half-up (ties away from zero) on the shortest decimal form of the value
// - sum_round1 accumulates in decimal arithmetic, so totals carry no binary drift
// - parse_yyyymmdd accepts exactly 8 digits forming a real calendar date
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::str::FromStr;

use chrono::{Local, NaiveDate};
use clap::CommandFactory;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

static EIGHT_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").expect("static regex"));

fn to_decimal(x: f64) -> Option<Decimal> {
  // f64 Display is the shortest representation that round-trips, no exponent.
  Decimal::from_str(&x.to_string()).ok()
}

/// Round to one decimal place, halves away from zero.
pub fn round1(x: f64) -> f64 {
  match to_decimal(x) {
    Some(d) => d
      .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
      .to_f64()
      .unwrap_or(x),
    None => (x * 10.0).round() / 10.0,
  }
}

/// Sum hour values exactly, then round the total with `round1`.
pub fn sum_round1<I>(values: I) -> f64
where
  I: IntoIterator<Item = f64>,
{
  let mut total = Decimal::ZERO;
  let mut fallback = 0.0f64;
  let mut exact = true;

  for v in values {
    fallback += v;
    match to_decimal(v) {
      Some(d) if exact => total += d,
      _ => exact = false,
    }
  }

  if exact {
    total
      .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
      .to_f64()
      .unwrap_or(fallback)
  } else {
    round1(fallback)
  }
}

/// Parse an 8-digit `YYYYMMDD` string.
pub fn parse_yyyymmdd(raw: &str) -> Option<NaiveDate> {
  let s = raw.trim();
  if !EIGHT_DIGITS.is_match(s) {
    return None;
  }
  NaiveDate::parse_from_str(s, "%Y%m%d").ok()
}

pub fn format_yyyymmdd(date: NaiveDate) -> String {
  date.format("%Y%m%d").to_string()
}

/// Strip date separators the task source leaves in (`2025-06-02` → `20250602`).
pub fn strip_date_separators(raw: &str) -> String {
  raw.trim().replace('-', "")
}

/// Returns the effective "today" given an optional override.
///
/// Centralizes test determinism without sprinkling `Local::now()` through the engine.
pub fn effective_today(override_today: Option<NaiveDate>) -> NaiveDate {
  override_today.unwrap_or_else(|| Local::now().date_naive())
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
