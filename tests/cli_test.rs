// tests/cli_test.rs

use assert_cmd::Command;
use predicates::prelude::*;

fn main_command() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    main_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("download"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_missing_subcommand_shows_usage() {
    main_command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_download_help_shows_options() {
    main_command()
        .args(["download", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--technology"))
        .stdout(predicate::str::contains("--course"))
        .stdout(predicate::str::contains("no-verify"));
}

#[test]
fn test_technology_and_course_filters_are_exclusive() {
    main_command()
        .args(["download", "-t", "react", "-c", "hooks"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("只能指定一个"));
}

#[test]
fn test_password_conflicts_with_ask_password() {
    main_command()
        .args(["config", "--password", "secret", "--ask-password"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
