// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Select sub-tasks touching the window, allocate them, and group them per member and parent issue
// role: engine/aggregation
// inputs: Vec<Task>, built Calendar, three WeekWindow values, today, AllocationPolicy
// outputs: WorkhourReport { week, members } with per-member weekly totals
// invariants:
// - Members sorted by name, groups by parent id, sub-tasks by task id (stable)
// - A member-week total equals round1 of the sum of that week over contributing sub-tasks
// - Groups are kept even when every sub-task in them was excluded
// - Same inputs produce identical reports
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::allocate::{allocate_task, substantive_hours, AllocationPolicy};
use crate::calendar::Calendar;
use crate::model::{IssueGroup, MemberReport, SubIssueEntry, Task, WeekWindow, WorkhourReport};
use crate::util::sum_round1;
use crate::week::{window_span, WINDOW_WEEKS};

pub const UNASSIGNED: &str = "NA";

/// Parent issue id -> summary, from `Manpower` tasks.
pub fn parent_names(tasks: &[Task]) -> HashMap<&str, &str> {
  tasks
    .iter()
    .filter(|t| t.is_parent())
    .map(|t| (t.id.as_str(), t.name.as_str()))
    .collect()
}

/// Whether the task's `[start, end]` range touches `[span.0, span.1]`. Tasks missing a date never do.
pub fn intersects(task: &Task, span: (NaiveDate, NaiveDate)) -> bool {
  match (task.start_date, task.end_date) {
    (Some(start), Some(end)) => !(start > span.1 || end < span.0),
    _ => false,
  }
}

#[derive(Default)]
struct MemberAcc {
  groups: BTreeMap<String, Vec<SubIssueEntry>>,
  contributing: Vec<[f64; WINDOW_WEEKS]>,
}

pub fn build_report(
  tasks: &[Task],
  calendar: &Calendar,
  windows: &[WeekWindow],
  today: NaiveDate,
  policy: &AllocationPolicy,
) -> WorkhourReport {
  let names = parent_names(tasks);
  let mut members: BTreeMap<String, MemberAcc> = BTreeMap::new();

  if let Some(span) = window_span(windows) {
    for task in tasks.iter().filter(|t| t.is_sub_task()) {
      if task.start_date.is_none() || task.end_date.is_none() {
        debug!(task = %task.id, "sub-task without target dates skipped");
        continue;
      }
      if !intersects(task, span) {
        continue;
      }

      let member = task.assignee.clone().unwrap_or_else(|| UNASSIGNED.to_string());
      let parent = task.parent_id.clone().unwrap_or_else(|| UNASSIGNED.to_string());
      let acc = members.entry(member).or_default();
      let group = acc.groups.entry(parent).or_default();

      let Some(man_hours) = substantive_hours(task, policy) else {
        debug!(task = %task.id, "placeholder man-hours; excluded");
        continue;
      };
      let Some(rec) = allocate_task(task, calendar, windows, today, policy) else {
        continue;
      };

      let entry = SubIssueEntry::from_allocation(task, man_hours, &rec);
      if rec.contributes() {
        acc.contributing.push(entry.weekly_hours());
      }
      group.push(entry);
    }
  }

  let members = members
    .into_iter()
    .map(|(name, acc)| {
      let issue = acc
        .groups
        .into_iter()
        .map(|(parent, mut subs)| {
          subs.sort_by(|a, b| a.sub_issue_id.cmp(&b.sub_issue_id));
          let main_issue_name = names.get(parent.as_str()).map(|s| s.to_string()).unwrap_or_else(|| {
            if parent != UNASSIGNED {
              debug!(parent = %parent, "parent issue not in snapshot");
            }
            String::new()
          });
          IssueGroup { main_issue: parent, main_issue_name, sub_issue: subs }
        })
        .collect();

      let week = |i: usize| sum_round1(acc.contributing.iter().map(|h| h[i]));
      MemberReport {
        name,
        issue,
        week_1_hours: week(0),
        week_2_hours: week(1),
        week_3_hours: week(2),
      }
    })
    .collect();

  WorkhourReport { week: windows.to_vec(), members }
}
