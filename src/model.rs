// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the calendar, task and report model shared by ingestion, the engine and rendering
// role: model/types
// outputs: Serializable structs with stable field names consumed by downstream renderers
// invariants: Report JSON field names (wh_*, main_issue*, sub_issue*, week_N_hours) never change; dates serialize as YYYYMMDD
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Weekday symbols as published by the holiday calendar source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekdaySymbol {
  #[serde(rename = "日")]
  Sun,
  #[serde(rename = "一")]
  Mon,
  #[serde(rename = "二")]
  Tue,
  #[serde(rename = "三")]
  Wed,
  #[serde(rename = "四")]
  Thu,
  #[serde(rename = "五")]
  Fri,
  #[serde(rename = "六")]
  Sat,
}

impl WeekdaySymbol {
  pub fn parse(symbol: &str) -> Option<Self> {
    match symbol.trim() {
      "日" => Some(Self::Sun),
      "一" => Some(Self::Mon),
      "二" => Some(Self::Tue),
      "三" => Some(Self::Wed),
      "四" => Some(Self::Thu),
      "五" => Some(Self::Fri),
      "六" => Some(Self::Sat),
      _ => None,
    }
  }

  pub fn symbol(self) -> &'static str {
    match self {
      Self::Sun => "日",
      Self::Mon => "一",
      Self::Tue => "二",
      Self::Wed => "三",
      Self::Thu => "四",
      Self::Fri => "五",
      Self::Sat => "六",
    }
  }

  pub fn from_weekday(wd: Weekday) -> Self {
    match wd {
      Weekday::Sun => Self::Sun,
      Weekday::Mon => Self::Mon,
      Weekday::Tue => Self::Tue,
      Weekday::Wed => Self::Wed,
      Weekday::Thu => Self::Thu,
      Weekday::Fri => Self::Fri,
      Weekday::Sat => Self::Sat,
    }
  }

  pub fn is_weekend(self) -> bool {
    matches!(self, Self::Sat | Self::Sun)
  }
}

/// Serde adapter for dates rendered as 8-digit `YYYYMMDD` strings.
pub mod yyyymmdd {
  use chrono::NaiveDate;
  use serde::{Deserialize, Deserializer, Serializer};

  pub const FORMAT: &str = "%Y%m%d";

  pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&date.format(FORMAT).to_string())
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
  }
}

/// Calendar record exactly as the calendar source publishes it; every field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCalendarDay {
  #[serde(default)]
  pub date: Option<String>,
  #[serde(default)]
  pub week: Option<String>,
  #[serde(rename = "isHoliday", default)]
  pub is_holiday: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
  #[serde(with = "yyyymmdd")]
  pub date: NaiveDate,
  #[serde(rename = "week")]
  pub weekday: WeekdaySymbol,
  #[serde(rename = "isHoliday")]
  pub is_holiday: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl CalendarDay {
  pub fn is_workday(&self) -> bool {
    !self.is_holiday
  }
}

pub const ISSUE_TYPE_PARENT: &str = "Manpower";
pub const ISSUE_TYPE_SUB: &str = "Sub-Manpower";

/// A task after ingestion: the `"NA"` sentinel is gone, dates are parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
  pub id: String,
  pub issue_type: Option<String>,
  pub name: String,
  pub status: Option<String>,
  pub assignee: Option<String>,
  pub parent_id: Option<String>,
  pub man_hours: Option<f64>,
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
  pub resolution: Option<String>,
}

impl Task {
  pub fn is_parent(&self) -> bool {
    self.issue_type.as_deref() == Some(ISSUE_TYPE_PARENT)
  }

  pub fn is_sub_task(&self) -> bool {
    self.issue_type.as_deref() == Some(ISSUE_TYPE_SUB)
  }
}

/// Normalized task record as written by the task fetcher (`Jira_Tasks.json`).
/// NA-able fields stay as raw JSON so ingestion can map the sentinel explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
  #[serde(rename = "Issue")]
  pub issue: String,
  #[serde(rename = "IssueType", default)]
  pub issue_type: serde_json::Value,
  #[serde(rename = "Summary", default)]
  pub summary: serde_json::Value,
  #[serde(rename = "Status", default)]
  pub status: serde_json::Value,
  #[serde(rename = "Assignee", default)]
  pub assignee: serde_json::Value,
  #[serde(rename = "Target Start", default)]
  pub target_start: serde_json::Value,
  #[serde(rename = "Target End", default)]
  pub target_end: serde_json::Value,
  #[serde(rename = "Man-hour", default)]
  pub man_hour: serde_json::Value,
  #[serde(rename = "Parent", default)]
  pub parent: serde_json::Value,
  #[serde(rename = "resolutiondate", default)]
  pub resolution_date: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekWindow {
  #[serde(rename = "wh_name")]
  pub label: String,
  #[serde(rename = "wh_week_id")]
  pub week_id: String,
  #[serde(rename = "wh_week_start_date", with = "yyyymmdd")]
  pub start_date: NaiveDate,
  #[serde(rename = "wh_week_end_date", with = "yyyymmdd")]
  pub end_date: NaiveDate,
  #[serde(rename = "wh_week_workdates")]
  pub workday_count: usize,
  #[serde(rename = "wh_week_uplimit_hours")]
  pub upper_limit_hours: f64,
  #[serde(rename = "wh_week_downlimit_hours")]
  pub lower_limit_hours: f64,
}

/// Workload of one member-week compared with the week's capacity bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
  Over,
  Under,
  Within,
}

impl WeekWindow {
  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start_date <= date && date <= self.end_date
  }

  pub fn classify(&self, hours: f64) -> LoadStatus {
    if hours > self.upper_limit_hours {
      LoadStatus::Over
    } else if hours < self.lower_limit_hours {
      LoadStatus::Under
    } else {
      LoadStatus::Within
    }
  }
}

/// Per-task allocation over the 3-week window.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRecord {
  pub per_workday_hours: f64,
  pub workday_count_in_span: usize,
  pub workdays_in_week: [usize; 3],
  pub allocated_hours: [f64; 3],
}

impl AllocationRecord {
  /// Whether the task counts toward the member's weekly totals.
  pub fn contributes(&self) -> bool {
    self.allocated_hours.iter().any(|h| *h != 0.0)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubIssueEntry {
  pub sub_issue_id: String,
  pub sub_issue_name: String,
  pub sub_issue_manpower: f64,
  pub sub_issue_work_day: usize,
  pub sub_issue_preday_hours: f64,
  pub sub_issue_work_day_week1: usize,
  pub sub_issue_work_day_week2: usize,
  pub sub_issue_work_day_week3: usize,
  pub week_1_hours: f64,
  pub week_2_hours: f64,
  pub week_3_hours: f64,
  pub resolutiondate: Option<String>,
}

impl SubIssueEntry {
  pub fn from_allocation(task: &Task, man_hours: f64, rec: &AllocationRecord) -> Self {
    Self {
      sub_issue_id: task.id.clone(),
      sub_issue_name: task.name.clone(),
      sub_issue_manpower: man_hours,
      sub_issue_work_day: rec.workday_count_in_span,
      sub_issue_preday_hours: rec.per_workday_hours,
      sub_issue_work_day_week1: rec.workdays_in_week[0],
      sub_issue_work_day_week2: rec.workdays_in_week[1],
      sub_issue_work_day_week3: rec.workdays_in_week[2],
      week_1_hours: rec.allocated_hours[0],
      week_2_hours: rec.allocated_hours[1],
      week_3_hours: rec.allocated_hours[2],
      resolutiondate: task.resolution.clone(),
    }
  }

  pub fn weekly_hours(&self) -> [f64; 3] {
    [self.week_1_hours, self.week_2_hours, self.week_3_hours]
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueGroup {
  pub main_issue: String,
  pub main_issue_name: String,
  pub sub_issue: Vec<SubIssueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberReport {
  pub name: String,
  pub issue: Vec<IssueGroup>,
  pub week_1_hours: f64,
  pub week_2_hours: f64,
  pub week_3_hours: f64,
}

impl MemberReport {
  pub fn weekly_totals(&self) -> [f64; 3] {
    [self.week_1_hours, self.week_2_hours, self.week_3_hours]
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkhourReport {
  pub week: Vec<WeekWindow>,
  pub members: Vec<MemberReport>,
}
