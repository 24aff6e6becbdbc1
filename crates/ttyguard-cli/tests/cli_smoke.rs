//! CLI smoke tests.
//!
//! Test processes run with piped stdio, so every terminal query is expected
//! to fail the way it would under redirection.

mod common;

use common::{EXIT_IO_ERROR, ttyguard_cmd};
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    ttyguard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("size"))
        .stdout(predicate::str::contains("width"))
        .stdout(predicate::str::contains("hold"));
}

#[test]
fn test_size_on_pipe_fails_with_io_error() {
    ttyguard_cmd()
        .arg("size")
        .assert()
        .failure()
        .code(EXIT_IO_ERROR)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to query terminal size"));
}

#[test]
fn test_width_on_pipe_fails_with_io_error() {
    ttyguard_cmd()
        .arg("width")
        .assert()
        .failure()
        .code(EXIT_IO_ERROR)
        .stderr(predicate::str::contains("not a terminal"));
}

#[test]
fn test_hold_on_piped_stdin_fails_before_locking() {
    ttyguard_cmd()
        .args(["hold", "--seconds", "0"])
        .write_stdin("")
        .assert()
        .failure()
        .code(EXIT_IO_ERROR)
        .stderr(predicate::str::contains("Failed to get terminal attributes"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    ttyguard_cmd().arg("resize").assert().failure().code(2);
}
