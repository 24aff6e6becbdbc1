//! Platform terminal-control primitives.
//!
//! The rest of the crate only talks to [`TerminalControl`]. Each OS family
//! supplies its own binding, chosen at build time; [`SystemTerminal`] names
//! the one for the current target.

use std::io;

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod unsupported;

#[cfg(unix)]
pub use unix::Termios;
#[cfg(unix)]
pub use unix::UnixTerminal as SystemTerminal;
#[cfg(not(unix))]
pub use unsupported::UnsupportedAttributes;
#[cfg(not(unix))]
pub use unsupported::UnsupportedTerminal as SystemTerminal;

/// Terminal geometry at the moment it was queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub rows: u16,
    pub cols: u16,
}

impl Dimensions {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

/// Access to the echo bit of a terminal attribute snapshot.
pub trait EchoFlag {
    fn echo(&self) -> bool;

    /// Sets or clears the echo bit, leaving every other flag untouched.
    fn set_echo(&mut self, enabled: bool);
}

/// The three primitives the crate needs from the operating system.
pub trait TerminalControl: Send + Sync + 'static {
    type Attributes: EchoFlag + Clone + Send + 'static;

    /// Queries the window size of the output terminal.
    fn window_size(&self) -> io::Result<Dimensions>;

    /// Reads the current attributes of the input terminal.
    fn attributes(&self) -> io::Result<Self::Attributes>;

    /// Applies `attrs` to the input terminal in a single call.
    fn set_attributes(&self, attrs: &Self::Attributes) -> io::Result<()>;
}
