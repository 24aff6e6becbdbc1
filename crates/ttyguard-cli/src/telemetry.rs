//! Log output for the CLI.
//!
//! Logs never go to stdout: `size` and `width` print their result there and
//! scripts read it.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const LOG_FILE_ENV: &str = "TTYGUARD_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// An unset or empty `TTYGUARD_LOG` means stderr.
    fn parse(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => LogTarget::File(PathBuf::from(path)),
            _ => LogTarget::Stderr,
        }
    }

    fn from_env() -> Self {
        Self::parse(std::env::var_os(LOG_FILE_ENV))
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `default_level`.
///
/// The returned guard flushes the file writer when dropped and is `None`
/// when logging to stderr.
pub fn init_tracing(default_level: &str) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (writer, guard, ansi) = match LogTarget::from_env() {
        LogTarget::File(path) => match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                (BoxMakeWriter::new(non_blocking), Some(guard), false)
            }
            Err(err) => {
                eprintln!(
                    "Warning: failed to open log file {}: {}",
                    path.display(),
                    err
                );
                stderr_writer()
            }
        },
        LogTarget::Stderr => stderr_writer(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_names(true)
        .with_ansi(ansi)
        .with_writer(writer)
        .try_init()
        .ok()
        .and(guard)
}

fn stderr_writer() -> (BoxMakeWriter, Option<WorkerGuard>, bool) {
    (
        BoxMakeWriter::new(std::io::stderr),
        None,
        std::io::stderr().is_terminal(),
    )
}
