use test_support::{report_cmd, tasks_fixture};

#[test]
fn raw_search_payload_is_accepted() {
  let out = report_cmd(&tasks_fixture("jira_search.json")).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

  let members = v["members"].as_array().unwrap();
  assert_eq!(members.len(), 1);
  let jordan = &members[0];
  assert_eq!(jordan["name"], "Jordan Wu");
  assert_eq!(jordan["week_1_hours"], 12.0);
  assert_eq!(jordan["week_2_hours"], 20.0);
  assert_eq!(jordan["week_3_hours"], 0.0);

  let group = &jordan["issue"][0];
  assert_eq!(group["main_issue"], "MP-2");
  assert_eq!(group["main_issue_name"], "Platform upkeep");
  let subs = group["sub_issue"].as_array().unwrap();
  assert_eq!(subs.len(), 2);
  assert_eq!(subs[0]["sub_issue_id"], "MP-21");
  assert_eq!(subs[0]["sub_issue_preday_hours"], 4.0);
  // man-hours given as a numeric string
  assert_eq!(subs[1]["sub_issue_manpower"], 12.0);
  assert_eq!(subs[1]["resolutiondate"], "2025-06-03T18:00:00.000+0800");
}

#[test]
fn payload_of_unknown_shape_fails() {
  let td = test_support::tempdir();
  let path = td.path().join("tasks.json");
  std::fs::write(&path, r#"{"values": []}"#).unwrap();
  let out = report_cmd(&path).output().unwrap();
  assert!(!out.status.success());
  assert!(out.stdout.is_empty());
  let err = String::from_utf8_lossy(&out.stderr);
  assert!(err.contains("data integrity error"), "stderr: {err}");
}
