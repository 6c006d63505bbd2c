//! Command-line surface of the binaries.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_server_help() {
    Command::cargo_bin("figma-store")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--db-path"))
        .stdout(predicate::str::contains("--figma-token"));
}

#[test]
fn test_sync_requires_keys() {
    Command::cargo_bin("figma_sync")
        .unwrap()
        .env("FIGMA_TOKEN", "t")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<KEYS>"));
}

#[test]
fn test_dry_run_continues_past_failures() {
    // Nothing listens on port 1, so every fetch fails.
    Command::cargo_bin("figma_sync")
        .unwrap()
        .env("FIGMA_TOKEN", "t")
        .env("RUST_LOG", "info")
        .args(["--dry-run", "--figma-api-url", "http://127.0.0.1:1", "first1", "second2"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("first1"))
        .stdout(predicate::str::contains("second2"))
        .stderr(predicate::str::contains("2 of 2 files failed"));
}
