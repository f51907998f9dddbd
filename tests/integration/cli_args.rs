use predicates::prelude::*;
use test_support::{calendar_dir, cmd_bin, fixtures_dir, report_cmd, scratch_calendar_dir, tasks_fixture};

#[test]
fn rejects_ratio_outside_unit_range() {
  report_cmd(&tasks_fixture("basic.json"))
    .args(["--lower-limit-ratio", "1.5"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--lower-limit-ratio must be within [0, 1]"));
}

#[test]
fn rejects_non_positive_full_day_hours() {
  report_cmd(&tasks_fixture("basic.json"))
    .args(["--full-day-hours", "0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--full-day-hours must be greater than 0"));
}

#[test]
fn rejects_malformed_today_override() {
  cmd_bin()
    .arg("--calendar-dir")
    .arg(calendar_dir())
    .args(["--today-override", "June 2nd"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("YYYYMMDD"));
}

#[test]
fn rejects_unknown_format() {
  report_cmd(&tasks_fixture("basic.json"))
    .args(["--format", "xml"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_calendar_year_names_the_file() {
  report_cmd(&tasks_fixture("basic.json"))
    .args(["--year", "2031"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("2031.json"));
}

#[test]
fn today_outside_calendar_is_week_not_found() {
  cmd_bin()
    .arg("--calendar-dir")
    .arg(calendar_dir())
    .arg("--tasks")
    .arg(tasks_fixture("basic.json"))
    .args(["--year", "2025", "--today-override", "20260105"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("week not found"));
}

#[test]
fn year_end_window_is_empty_week() {
  cmd_bin()
    .arg("--calendar-dir")
    .arg(calendar_dir())
    .arg("--tasks")
    .arg(tasks_fixture("basic.json"))
    .args(["--today-override", "20251222"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("empty week").and(predicate::str::contains("554")));
}

fn year_end_tasks(dir: &std::path::Path) -> std::path::PathBuf {
  let tasks = serde_json::json!([
    { "Issue": "MP-5", "IssueType": "Manpower", "Summary": "Year-end close" },
    {
      "Issue": "MP-51", "IssueType": "Sub-Manpower", "Summary": "Archive ledgers",
      "Status": "In Progress", "Assignee": "Avery Lin", "Parent": "MP-5", "Man-hour": "36",
      "Target Start": "2025-12-29", "Target End": "2026-01-09"
    }
  ]);
  let path = dir.join("tasks.json");
  std::fs::write(&path, serde_json::to_vec(&tasks).unwrap()).unwrap();
  path
}

#[test]
fn december_run_merges_next_year_calendar() {
  let dir = scratch_calendar_dir();
  std::fs::copy(fixtures_dir().join("calendar_next/2026.json"), dir.path().join("2026.json")).unwrap();
  let tasks = year_end_tasks(dir.path());

  let out = cmd_bin()
    .arg("--calendar-dir")
    .arg(dir.path())
    .arg("--tasks")
    .arg(&tasks)
    .args(["--today-override", "20251231"])
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

  let ids: Vec<&str> = v["week"].as_array().unwrap().iter().map(|w| w["wh_week_id"].as_str().unwrap()).collect();
  assert_eq!(ids, vec!["601", "602", "603"]);
  // Jan 1 is a holiday in the 2026 calendar
  assert_eq!(v["week"][0]["wh_week_start_date"], "20251231");
  assert_eq!(v["week"][0]["wh_week_end_date"], "20260107");
  assert_eq!(v["week"][0]["wh_week_workdates"], 5);

  let m = &v["members"][0];
  assert_eq!(m["name"], "Avery Lin");
  let s = &m["issue"][0]["sub_issue"][0];
  assert_eq!(s["sub_issue_id"], "MP-51");
  assert_eq!(s["sub_issue_work_day"], 9);
  assert_eq!(s["sub_issue_preday_hours"], 4.0);
  assert_eq!(m["week_1_hours"], 20.0);
  assert_eq!(m["week_2_hours"], 8.0);
  assert_eq!(m["week_3_hours"], 0.0);
}

#[test]
fn december_run_without_next_year_is_empty_week() {
  let dir = scratch_calendar_dir();
  let tasks = year_end_tasks(dir.path());
  cmd_bin()
    .arg("--calendar-dir")
    .arg(dir.path())
    .arg("--tasks")
    .arg(&tasks)
    .args(["--today-override", "20251231"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("empty week").and(predicate::str::contains("602")));
}

#[test]
fn missing_task_file_fails() {
  let td = test_support::tempdir();
  report_cmd(&td.path().join("nope.json"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("nope.json"));
}
