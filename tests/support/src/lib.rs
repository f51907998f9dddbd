//! test-support: helpers shared by the manpower-report integration tests.
//!
//! ```no_run
//! use test_support::{cmd_bin, fixtures_dir, TODAY};
//!
//! #[test]
//! fn example() {
//!     let cal = fixtures_dir().join("calendar");
//!     cmd_bin().args(["--calendar-dir", cal.to_str().unwrap(), "--today-override", TODAY]);
//! }
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

pub const BIN: &str = "manpower-report";

/// Monday 2025-06-02; windows 523/524/525 against the 2025 fixture calendar.
pub const TODAY: &str = "20250602";

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Initialize insta settings once per test process; snapshots live in `tests/snapshots`.
pub fn init_insta() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let mut settings = insta::Settings::clone_current();
        settings.set_snapshot_path("../snapshots");
        settings.set_omit_expression(true);
        let guard = settings.bind_to_scope();
        std::mem::forget(guard);
    });
    Lazy::force(&INIT);
}

/// The top-level `tests/fixtures` directory (this crate lives in `tests/support`).
pub fn fixtures_dir() -> PathBuf {
    let support = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    support.parent().unwrap_or(&support).join("fixtures")
}

pub fn calendar_dir() -> PathBuf {
    fixtures_dir().join("calendar")
}

pub fn tasks_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("tasks").join(name)
}

/// Deserialize a JSON fixture into `T` (enable `serde` feature).
#[cfg(feature = "serde")]
pub fn read_fixture_json<T, P>(rel_path: P) -> T
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = fixtures_dir().join(rel_path);
    let file = std::fs::File::open(&path)
        .unwrap_or_else(|e| panic!("failed to open fixture {}: {e}", path.display()));
    serde_json::from_reader::<_, T>(file)
        .unwrap_or_else(|e| panic!("failed to parse JSON fixture {}: {e}", path.display()))
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// Temp directory holding a copy of the fixture calendar, for runs that write next to it.
pub fn scratch_calendar_dir() -> tempfile::TempDir {
    let td = tempdir();
    for entry in std::fs::read_dir(calendar_dir()).expect("calendar fixtures") {
        let entry = entry.expect("dir entry");
        std::fs::copy(entry.path(), td.path().join(entry.file_name())).expect("copy calendar fixture");
    }
    td
}

/// The `manpower-report` binary as an `assert_cmd` command, with `RUST_LOG` cleared.
pub fn cmd_bin() -> assert_cmd::Command {
    init_tracing();
    let mut cmd = assert_cmd::Command::cargo_bin(BIN).expect("binary target not found");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// `cmd_bin()` pointed at the fixture calendar with today pinned to [`TODAY`].
pub fn report_cmd(tasks: &Path) -> assert_cmd::Command {
    let mut cmd = cmd_bin();
    cmd.arg("--calendar-dir")
        .arg(calendar_dir())
        .arg("--tasks")
        .arg(tasks)
        .args(["--today-override", TODAY]);
    cmd
}
