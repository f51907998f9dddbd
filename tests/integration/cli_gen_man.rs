#[test]
fn cli_generates_man_page() {
  let out = test_support::cmd_bin().args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage starting with .TH and mentions the binary name
  assert!(s.contains(".TH"));
  assert!(s.contains("manpower"));
  // roff escapes dashes inside option names
  assert!(s.contains("calendar"));
  assert!(
    !s.contains("today-override") && !s.contains("today\\-override"),
    "hidden flags stay out of the man page"
  );
}
