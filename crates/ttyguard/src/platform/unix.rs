use std::fmt;
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::io::RawFd;

use super::Dimensions;
use super::EchoFlag;
use super::TerminalControl;

/// A `termios` snapshot of the input terminal.
#[derive(Clone, Copy)]
pub struct Termios(libc::termios);

impl Termios {
    pub fn local_flags(&self) -> libc::tcflag_t {
        self.0.c_lflag
    }
}

impl fmt::Debug for Termios {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Termios")
            .field("c_iflag", &self.0.c_iflag)
            .field("c_oflag", &self.0.c_oflag)
            .field("c_cflag", &self.0.c_cflag)
            .field("c_lflag", &self.0.c_lflag)
            .finish()
    }
}

impl EchoFlag for Termios {
    fn echo(&self) -> bool {
        self.0.c_lflag & libc::ECHO != 0
    }

    fn set_echo(&mut self, enabled: bool) {
        if enabled {
            self.0.c_lflag |= libc::ECHO;
        } else {
            self.0.c_lflag &= !libc::ECHO;
        }
    }
}

/// Standard input/output as seen through `ioctl` and `tcgetattr`.
///
/// The descriptors are borrowed for the life of the process and never closed.
#[derive(Debug, Clone, Copy)]
pub struct UnixTerminal {
    input: RawFd,
    output: RawFd,
}

impl UnixTerminal {
    pub fn new() -> Self {
        Self::from_fds(libc::STDIN_FILENO, libc::STDOUT_FILENO)
    }

    /// Uses `input` for attribute calls and `output` for size queries.
    pub fn from_fds(input: RawFd, output: RawFd) -> Self {
        Self { input, output }
    }
}

impl Default for UnixTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalControl for UnixTerminal {
    type Attributes = Termios;

    fn window_size(&self) -> io::Result<Dimensions> {
        let mut ws = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        // SAFETY: TIOCGWINSZ writes a `winsize` through the pointer, which
        // points at a live, properly aligned local.
        let rc = unsafe { libc::ioctl(self.output, libc::TIOCGWINSZ, &mut ws) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Dimensions::new(ws.ws_row, ws.ws_col))
    }

    fn attributes(&self) -> io::Result<Termios> {
        let mut termios = MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr fully initializes the struct when it returns 0.
        if unsafe { libc::tcgetattr(self.input, termios.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: checked the return code above.
        Ok(Termios(unsafe { termios.assume_init() }))
    }

    fn set_attributes(&self, attrs: &Termios) -> io::Result<()> {
        // SAFETY: `attrs.0` is a termios previously filled in by tcgetattr.
        if unsafe { libc::tcsetattr(self.input, libc::TCSANOW, &attrs.0) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}
