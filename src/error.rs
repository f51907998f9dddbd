// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fatal error taxonomy of the allocation engine (calendar, week indexing, week windows)
// role: errors/types
// outputs: EngineError variants; Result alias used by engine modules
// invariants: Only fatal conditions live here; per-task anomalies are logged and defaulted, never raised
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
  /// Calendar or task data is missing required fields or is inconsistent.
  #[error("data integrity error: {0}")]
  DataIntegrity(String),

  /// Today's date has no week mapping (usually the wrong calendar year was loaded).
  #[error("week not found: {today} is not present in the loaded calendar")]
  WeekNotFound { today: String },

  /// A week id inside the rolling window matches no calendar date.
  #[error("empty week: week id {week_id} matches no calendar date")]
  EmptyWeek { week_id: String },
}

impl EngineError {
  pub fn integrity(msg: impl Into<String>) -> Self {
    EngineError::DataIntegrity(msg.into())
  }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
