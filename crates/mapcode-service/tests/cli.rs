//! Command line checks for the service binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_options() {
    Command::cargo_bin("mapcode-service")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--silent"))
        .stdout(predicate::str::contains("--debug"));
}

#[test]
fn version_matches_the_package() {
    Command::cargo_bin("mapcode-service")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flags_are_reported_and_ignored() {
    Command::cargo_bin("mapcode-service")
        .unwrap()
        .args(["--frobnicate", "--help"])
        .assert()
        .success()
        .stderr(predicate::str::contains("--frobnicate"));
}
