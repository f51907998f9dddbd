use jsonschema::validator_for;
use test_support::{report_cmd, tasks_fixture};

fn read_schema(name: &str) -> serde_json::Value {
  let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let path = manifest_dir.join("tests").join("schemas").join(name);
  let data = std::fs::read(&path).expect("schema file");
  serde_json::from_slice(&data).expect("valid schema JSON")
}

fn compile_schema(name: &str) -> jsonschema::Validator {
  let schema = read_schema(name);
  validator_for(&schema).expect("compile schema")
}

fn report_for(fixture: &str) -> serde_json::Value {
  let out = report_cmd(&tasks_fixture(fixture)).output().unwrap();
  assert!(out.status.success());
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn normalized_task_report_conforms_to_schema() {
  let compiled = compile_schema("workhour-report.schema.json");
  let v = report_for("basic.json");
  compiled.validate(&v).expect("schema validation failed for normalized tasks");
}

#[test]
fn jira_payload_report_conforms_to_schema() {
  let compiled = compile_schema("workhour-report.schema.json");
  let v = report_for("jira_search.json");
  compiled.validate(&v).expect("schema validation failed for Jira payload");
}

#[test]
fn schema_rejects_renamed_fields() {
  let compiled = compile_schema("workhour-report.schema.json");
  let mut v = report_for("basic.json");
  let week = v["week"][0].as_object_mut().unwrap();
  let id = week.remove("wh_week_id").unwrap();
  week.insert("weekId".into(), id);
  assert!(!compiled.is_valid(&v));
}
