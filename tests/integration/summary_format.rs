use predicates::prelude::*;
use test_support::{report_cmd, tasks_fixture};

#[test]
fn summary_lists_members_with_capacity_markers() {
  let out = report_cmd(&tasks_fixture("basic.json"))
    .args(["--format", "summary"])
    .output()
    .unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);

  let lines: Vec<&str> = s.lines().collect();
  assert!(lines[0].starts_with("member"));
  assert!(lines[0].contains("523 w1"));
  assert!(lines[1].contains("24.0-40.0"));

  let avery = lines.iter().find(|l| l.starts_with("Avery Lin")).unwrap();
  assert!(avery.contains("46.7+"), "{avery}");
  assert!(avery.contains("13.3-"), "{avery}");
  assert!(avery.contains("24.0"), "{avery}");

  assert!(s.contains("3 members, 1 member-weeks over capacity, 5 under"), "{s}");
}

#[test]
fn summary_respects_policy_flags() {
  // 8h x 5 days x 0.25 = 10h lower bound
  report_cmd(&tasks_fixture("basic.json"))
    .args(["--format", "summary", "--lower-limit-ratio", "0.25"])
    .assert()
    .success()
    .stdout(predicate::str::contains("10.0-40.0"));
}
