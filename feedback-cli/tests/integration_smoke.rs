//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn feedback() -> Command {
    let mut cmd = Command::cargo_bin("feedback").unwrap();
    // Keep a developer's .env from leaking into assertions
    cmd.env_remove("DATABASE_URL").current_dir(std::env::temp_dir());
    cmd
}

#[test]
fn test_top_level_help_lists_commands() {
    feedback()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help() {
    feedback()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--skip-migrations"));
}

#[test]
fn test_migrate_help() {
    feedback()
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-connections"));
}

#[test]
fn test_version() {
    feedback()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_serve_rejects_bad_bind() {
    feedback()
        .args(["serve", "--bind", "not-an-address"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bind"));
}

#[test]
fn test_unknown_command_fails() {
    feedback().arg("frobnicate").assert().failure();
}

#[test]
fn test_migrate_without_database_url_fails() {
    feedback()
        .env("HOME", std::env::temp_dir())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}
