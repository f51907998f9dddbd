// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for extension traits over third-party types
// role: module/aggregation
// outputs: ext::serde_json (JsonFetch over Jira issue payloads)
// invariants: Pure extensions only
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod serde_json;
