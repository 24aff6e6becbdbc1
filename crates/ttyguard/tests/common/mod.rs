#![allow(dead_code)]

use std::env;
use std::process::{Command, Output};
use std::thread;
use std::time::{Duration, Instant};

use ttyguard::EchoGuard;
use ttyguard::GuardConfig;
use ttyguard::test_support::MockTerminal;

pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Guard over a mock terminal that never installs a watcher or exits.
pub fn quiet_guard(lflag: u64) -> (MockTerminal, EchoGuard<MockTerminal>) {
    let terminal = MockTerminal::new(lflag);
    let config = GuardConfig::from_env()
        .with_restore_on_signal(false)
        .with_auto_terminate(false);
    let guard = EchoGuard::with_config(terminal.clone(), config);
    (terminal, guard)
}

/// Polls `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

/// Names the test a re-executed test binary should act out.
pub const CHILD_SCENARIO_ENV: &str = "TTYGUARD_TEST_CHILD_SCENARIO";

/// Whether this process was started by [`run_child`] for `test_name`.
pub fn is_child(test_name: &str) -> bool {
    env::var(CHILD_SCENARIO_ENV).is_ok_and(|name| name == test_name)
}

/// Re-runs the current test binary for just `test_name`, in a fresh
/// process whose signal dispositions the parent's tests cannot disturb.
pub fn run_child(test_name: &str) -> Output {
    Command::new(env::current_exe().expect("test binary path"))
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_SCENARIO_ENV, test_name)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run child test process")
}
