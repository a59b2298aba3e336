//! End-to-end checks of the command line surface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn netpulse_command() -> Command {
    Command::cargo_bin("netpulse").expect("binary should be built")
}

#[test]
fn help_lists_flags() {
    netpulse_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--plain"));
}

#[test]
fn version_flag() {
    netpulse_command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn zero_interval_is_rejected() {
    netpulse_command()
        .args(["--plain", "-i", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));
}

#[test]
fn unparseable_interval_is_rejected() {
    netpulse_command()
        .args(["--plain", "--interval", "whenever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn count_requires_plain() {
    netpulse_command()
        .args(["-n", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--plain"));
}

#[test]
fn plain_mode_prints_baseline_line() {
    let dir = tempfile::tempdir().unwrap();
    let rc = dir.path().join("netpulserc");

    netpulse_command()
        .args(["--plain", "-n", "1", "-i", "200ms", "-C"])
        .arg(&rc)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d{2}:\d{2}:\d{2}  down -  up -  (online|offline)\n$").unwrap());

    // Plain mode never writes settings
    assert!(!rc.exists());
}
