//! wardd help/version/startup specs.
//!
//! Verify --help and --version work without touching the scheduler, and
//! that a missing seed file is reported rather than silently ignored.

use crate::prelude::*;

#[test]
fn wardd_version_shows_version() {
    let output = wardd_cmd().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("wardd 0.1.0"), "got: {stdout}");
}

#[test]
fn wardd_short_v_shows_version() {
    let output = wardd_cmd().arg("-V").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("wardd 0.1.0"), "got: {stdout}");
}

#[test]
fn wardd_help_shows_usage() {
    let output = wardd_cmd().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("USAGE:"));
    assert!(stdout.contains("WARD_SEED"));
    assert!(stdout.contains("WARD_COMMAND_FILE"));
}

#[test]
fn wardd_exits_nonzero_on_missing_seed_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = wardd_cmd()
        .current_dir(dir.path())
        .env("WARD_SEED", dir.path().join("does-not-exist.json"))
        .env_remove("WARD_COMMAND_FILE")
        .output()
        .unwrap();
    assert!(!output.status.success(), "expected failure, stdout: {}", String::from_utf8_lossy(&output.stdout));
}
