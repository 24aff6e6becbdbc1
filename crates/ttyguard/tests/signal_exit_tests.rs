//! Checks how the process ends when a watched signal arrives.
//!
//! Each test re-executes this binary as a child that acts out one scenario
//! and then raises a signal; the parent inspects how the child died.

#![cfg(unix)]

mod common;

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::thread;

use common::{WAIT_TIMEOUT, is_child, run_child};
use signal_hook::consts::SIGTERM;
use signal_hook::low_level::raise;
use ttyguard::EchoGuard;
use ttyguard::GuardConfig;
use ttyguard::test_support::MockTerminal;

fn restoring_guard(terminal: &MockTerminal) -> EchoGuard<MockTerminal> {
    let config = GuardConfig::from_env()
        .with_restore_on_signal(true)
        .with_auto_terminate(true);
    EchoGuard::with_config(terminal.clone(), config)
}

/// Default action of `signal`, or the `128 + n` exit used when it cannot
/// be emulated.
fn died_from(status: &ExitStatus, signal: i32) -> bool {
    status.signal() == Some(signal) || status.code() == Some(128 + signal)
}

fn child_stdout(name: &str) -> (ExitStatus, String) {
    let output = run_child(name);
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    (output.status, stdout)
}

fn written_flags(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .filter_map(|line| line.split_once("lflag=").map(|(_, flags)| flags.trim()))
        .collect()
}

#[test]
fn test_signal_after_unlock_keeps_default_action() {
    const NAME: &str = "test_signal_after_unlock_keeps_default_action";
    if is_child(NAME) {
        let terminal = MockTerminal::new(0b1010);
        let guard = restoring_guard(&terminal);
        guard.lock().unwrap();
        guard.unlock().unwrap();
        println!("unlocked");

        raise(SIGTERM).unwrap();
        thread::sleep(WAIT_TIMEOUT);
        println!("survived");
        return;
    }

    let (status, stdout) = child_stdout(NAME);
    assert!(stdout.contains("unlocked"), "child output: {}", stdout);
    assert!(!stdout.contains("survived"), "SIGTERM was swallowed: {}", stdout);
    assert!(died_from(&status, SIGTERM), "child status: {:?}", status);
}

#[test]
fn test_signal_after_many_cycles_keeps_default_action() {
    const NAME: &str = "test_signal_after_many_cycles_keeps_default_action";
    if is_child(NAME) {
        let terminal = MockTerminal::new(0b1010);
        for _ in 0..3 {
            let guard = restoring_guard(&terminal);
            guard.lock().unwrap();
            guard.unlock().unwrap();
        }
        println!("released");

        raise(SIGTERM).unwrap();
        thread::sleep(WAIT_TIMEOUT);
        println!("survived");
        return;
    }

    let (status, stdout) = child_stdout(NAME);
    assert!(stdout.contains("released"), "child output: {}", stdout);
    assert!(!stdout.contains("survived"), "SIGTERM was swallowed: {}", stdout);
    assert!(died_from(&status, SIGTERM), "child status: {:?}", status);
}

#[test]
fn test_signal_while_locked_restores_then_terminates() {
    const NAME: &str = "test_signal_while_locked_restores_then_terminates";
    if is_child(NAME) {
        let terminal = MockTerminal::new(0b1010).log_writes_to_stdout();
        let guard = restoring_guard(&terminal);
        guard.lock().unwrap();

        raise(SIGTERM).unwrap();
        thread::sleep(WAIT_TIMEOUT);
        println!("survived");
        return;
    }

    let (status, stdout) = child_stdout(NAME);
    assert!(!stdout.contains("survived"), "SIGTERM was swallowed: {}", stdout);
    assert!(died_from(&status, SIGTERM), "child status: {:?}", status);
    assert_eq!(
        written_flags(&stdout),
        vec!["0b1000", "0b1010"],
        "echo was not restored before exit: {}",
        stdout
    );
}
