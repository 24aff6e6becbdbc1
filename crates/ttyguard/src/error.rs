//! Terminal control errors with structured context.
//!
//! Every variant that wraps a platform failure keeps the original
//! [`io::Error`] as its source so callers can report the OS error code.

use std::io;

use thiserror::Error;

use crate::echo::EchoState;

/// Error category for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The terminal device or OS refused the request
    External,
    /// The call was not valid for the guard's current state
    InvalidState,
    /// Failure inside the library's own machinery
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::External => "external",
            ErrorCategory::InvalidState => "invalid_state",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum TermError {
    #[error("Failed to query terminal size: {0}")]
    DeviceQuery(#[source] io::Error),
    #[error("Failed to get terminal attributes: {0}")]
    AttributeRead(#[source] io::Error),
    #[error("Failed to set terminal attributes: {0}")]
    AttributeWrite(#[source] io::Error),
    #[error("Cannot {operation} echo: terminal is already {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: EchoState,
    },
    #[error("Failed to install signal watcher: {0}")]
    SignalSetup(String),
}

impl TermError {
    /// Returns the error category for programmatic handling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TermError::DeviceQuery(_)
            | TermError::AttributeRead(_)
            | TermError::AttributeWrite(_) => ErrorCategory::External,
            TermError::InvalidStateTransition { .. } => ErrorCategory::InvalidState,
            TermError::SignalSetup(_) => ErrorCategory::Internal,
        }
    }

    /// Returns the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            TermError::DeviceQuery(_) => "window_size",
            TermError::AttributeRead(_) => "get_attributes",
            TermError::AttributeWrite(_) => "set_attributes",
            TermError::InvalidStateTransition { operation, .. } => *operation,
            TermError::SignalSetup(_) => "signal_setup",
        }
    }

    /// Returns the underlying platform error, if any.
    pub fn os_error(&self) -> Option<&io::Error> {
        match self {
            TermError::DeviceQuery(e) | TermError::AttributeRead(e) | TermError::AttributeWrite(e) => {
                Some(e)
            }
            TermError::InvalidStateTransition { .. } | TermError::SignalSetup(_) => None,
        }
    }

    /// Returns a helpful suggestion for resolving the error.
    pub fn suggestion(&self) -> String {
        match self {
            TermError::DeviceQuery(_) => {
                "Standard output is not a terminal. Run interactively or stop redirecting output to a file or pipe."
                    .to_string()
            }
            TermError::AttributeRead(_) | TermError::AttributeWrite(_) => {
                "Standard input is not a terminal or its mode cannot be changed. Run interactively with a TTY attached."
                    .to_string()
            }
            TermError::InvalidStateTransition { operation, .. } => {
                format!(
                    "Pair every lock with exactly one unlock; '{}' was called out of order.",
                    operation
                )
            }
            TermError::SignalSetup(_) => {
                "Signal handlers could not be installed. Set TTYGUARD_RESTORE_ON_SIGNAL=0 to lock without them."
                    .to_string()
            }
        }
    }

    /// Terminal control failures are not transient, so none are retried.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
