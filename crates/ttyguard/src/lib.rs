#![deny(clippy::all)]

//! Terminal size probing and keyboard echo locking for interactive output.
//!
//! [`terminal_size`] and [`terminal_width`] query the terminal attached to
//! standard output. [`EchoGuard`] disables echo on standard input while a
//! redraw loop runs and restores it on [`EchoGuard::unlock`], or from a
//! signal watcher thread if the process is interrupted first.

mod config;
pub mod echo;
pub mod error;
pub mod platform;
mod signal_handler;
mod size;
mod sync;
#[doc(hidden)]
pub mod test_support;

pub use config::GuardConfig;
pub use echo::EchoGuard;
pub use echo::EchoLock;
pub use echo::EchoState;
pub use echo::global;
pub use echo::lock_echo;
pub use echo::unlock_echo;
pub use error::ErrorCategory;
pub use error::TermError;
pub use platform::Dimensions;
pub use platform::EchoFlag;
pub use platform::SystemTerminal;
pub use platform::TerminalControl;
pub use signal_handler::WATCHED_SIGNALS;
pub use size::SizeProbe;
pub use size::terminal_size;
pub use size::terminal_width;

pub type Result<T> = std::result::Result<T, TermError>;
