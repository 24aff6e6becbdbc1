//! Scripted terminal for tests.

use std::io;
use std::sync::Arc;
use std::sync::Mutex;

use crate::platform::Dimensions;
use crate::platform::EchoFlag;
use crate::platform::TerminalControl;
use crate::sync::mutex_lock_or_recover;

/// Echo bit used by [`MockAttributes`].
pub const MOCK_ECHO: u64 = 0b0010;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockAttributes {
    pub lflag: u64,
}

impl EchoFlag for MockAttributes {
    fn echo(&self) -> bool {
        self.lflag & MOCK_ECHO != 0
    }

    fn set_echo(&mut self, enabled: bool) {
        if enabled {
            self.lflag |= MOCK_ECHO;
        } else {
            self.lflag &= !MOCK_ECHO;
        }
    }
}

#[derive(Debug)]
struct MockState {
    lflag: u64,
    size: Dimensions,
    size_error: Option<i32>,
    get_error: Option<i32>,
    set_error: Option<i32>,
    size_queries: usize,
    set_calls: usize,
    log_writes: bool,
}

/// In-memory terminal. Clones share state, so a test can keep one handle
/// while the code under test owns another.
#[derive(Debug, Clone)]
pub struct MockTerminal {
    state: Arc<Mutex<MockState>>,
}

impl MockTerminal {
    pub fn new(lflag: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                lflag,
                size: Dimensions::new(24, 80),
                size_error: None,
                get_error: None,
                set_error: None,
                size_queries: 0,
                set_calls: 0,
                log_writes: false,
            })),
        }
    }

    pub fn with_size(self, rows: u16, cols: u16) -> Self {
        self.resize(rows, cols);
        self
    }

    pub fn resize(&self, rows: u16, cols: u16) {
        mutex_lock_or_recover(&self.state).size = Dimensions::new(rows, cols);
    }

    pub fn local_flags(&self) -> u64 {
        mutex_lock_or_recover(&self.state).lflag
    }

    /// Changes flags behind the guard's back, as a terminal driver might.
    pub fn set_local_flags(&self, lflag: u64) {
        mutex_lock_or_recover(&self.state).lflag = lflag;
    }

    pub fn echo_enabled(&self) -> bool {
        self.local_flags() & MOCK_ECHO != 0
    }

    pub fn fail_window_size(&self, errno: i32) {
        mutex_lock_or_recover(&self.state).size_error = Some(errno);
    }

    pub fn fail_get_attributes(&self, errno: i32) {
        mutex_lock_or_recover(&self.state).get_error = Some(errno);
    }

    pub fn fail_set_attributes(&self, errno: i32) {
        mutex_lock_or_recover(&self.state).set_error = Some(errno);
    }

    pub fn clear_failures(&self) {
        let mut state = mutex_lock_or_recover(&self.state);
        state.size_error = None;
        state.get_error = None;
        state.set_error = None;
    }

    /// Prints `lflag=<binary>` on stdout after every successful write, so a
    /// parent process can see what a child wrote before it died.
    pub fn log_writes_to_stdout(self) -> Self {
        mutex_lock_or_recover(&self.state).log_writes = true;
        self
    }

    pub fn size_queries(&self) -> usize {
        mutex_lock_or_recover(&self.state).size_queries
    }

    pub fn set_calls(&self) -> usize {
        mutex_lock_or_recover(&self.state).set_calls
    }
}

impl TerminalControl for MockTerminal {
    type Attributes = MockAttributes;

    fn window_size(&self) -> io::Result<Dimensions> {
        let mut state = mutex_lock_or_recover(&self.state);
        state.size_queries += 1;
        match state.size_error {
            Some(errno) => Err(io::Error::from_raw_os_error(errno)),
            None => Ok(state.size),
        }
    }

    fn attributes(&self) -> io::Result<MockAttributes> {
        let state = mutex_lock_or_recover(&self.state);
        match state.get_error {
            Some(errno) => Err(io::Error::from_raw_os_error(errno)),
            None => Ok(MockAttributes { lflag: state.lflag }),
        }
    }

    fn set_attributes(&self, attrs: &MockAttributes) -> io::Result<()> {
        let mut state = mutex_lock_or_recover(&self.state);
        state.set_calls += 1;
        if let Some(errno) = state.set_error {
            return Err(io::Error::from_raw_os_error(errno));
        }
        state.lflag = attrs.lflag;
        if state.log_writes {
            println!("lflag={:#b}", attrs.lflag);
        }
        Ok(())
    }
}
