use std::io;

use super::Dimensions;
use super::EchoFlag;
use super::TerminalControl;

const UNSUPPORTED: &str = "terminal control is not implemented for this platform";

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedAttributes {
    echo: bool,
}

impl EchoFlag for UnsupportedAttributes {
    fn echo(&self) -> bool {
        self.echo
    }

    fn set_echo(&mut self, enabled: bool) {
        self.echo = enabled;
    }
}

/// Placeholder binding; every primitive reports `ErrorKind::Unsupported`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedTerminal;

impl UnsupportedTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl TerminalControl for UnsupportedTerminal {
    type Attributes = UnsupportedAttributes;

    fn window_size(&self) -> io::Result<Dimensions> {
        Err(io::Error::new(io::ErrorKind::Unsupported, UNSUPPORTED))
    }

    fn attributes(&self) -> io::Result<UnsupportedAttributes> {
        Err(io::Error::new(io::ErrorKind::Unsupported, UNSUPPORTED))
    }

    fn set_attributes(&self, _attrs: &UnsupportedAttributes) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, UNSUPPORTED))
    }
}
