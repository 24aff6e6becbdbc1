use std::env;

use crate::signal_handler::WATCHED_SIGNALS;

const DEFAULT_AUTO_TERMINATE: bool = true;
const DEFAULT_RESTORE_ON_SIGNAL: bool = true;

#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Terminate the process with the signal's default action after echo has
    /// been restored by the watcher.
    pub auto_terminate: bool,
    /// Install a signal watcher for the duration of each lock.
    pub restore_on_signal: bool,
    /// Signals the watcher restores echo on.
    pub signals: Vec<i32>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl GuardConfig {
    pub fn from_env() -> Self {
        Self {
            auto_terminate: env_flag("TTYGUARD_AUTO_TERMINATE").unwrap_or(DEFAULT_AUTO_TERMINATE),
            restore_on_signal: env_flag("TTYGUARD_RESTORE_ON_SIGNAL")
                .unwrap_or(DEFAULT_RESTORE_ON_SIGNAL),
            signals: WATCHED_SIGNALS.to_vec(),
        }
    }

    pub fn with_auto_terminate(mut self, enabled: bool) -> Self {
        self.auto_terminate = enabled;
        self
    }

    pub fn with_restore_on_signal(mut self, enabled: bool) -> Self {
        self.restore_on_signal = enabled;
        self
    }

    pub fn with_signals(mut self, signals: &[i32]) -> Self {
        self.signals = signals.to_vec();
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
