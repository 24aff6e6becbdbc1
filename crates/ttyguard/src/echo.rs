//! Keyboard echo locking.
//!
//! [`EchoGuard`] is an explicit two-state machine. `lock` clears the echo
//! bit on the input terminal and arms a signal watcher; `unlock` puts the
//! bit back to its pre-lock value and disarms the watcher. Calls made out of
//! order fail with [`TermError::InvalidStateTransition`] and leave the
//! terminal alone.

use std::fmt;
use std::mem;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use tracing::{debug, warn};

use crate::Result;
use crate::config::GuardConfig;
use crate::error::TermError;
use crate::platform::EchoFlag;
use crate::platform::SystemTerminal;
use crate::platform::TerminalControl;
use crate::signal_handler::SignalWatcher;
use crate::signal_handler::Disposition;
use crate::sync::mutex_lock_or_recover;

const NO_SIGNAL: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoState {
    Unlocked,
    Locked,
}

impl fmt::Display for EchoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EchoState::Unlocked => f.write_str("unlocked"),
            EchoState::Locked => f.write_str("locked"),
        }
    }
}

enum Slot<A> {
    Unlocked,
    Locked {
        /// Attributes read just before echo was cleared.
        saved: A,
        watcher: Option<SignalWatcher>,
    },
}

impl<A> Slot<A> {
    fn state(&self) -> EchoState {
        match self {
            Slot::Unlocked => EchoState::Unlocked,
            Slot::Locked { .. } => EchoState::Locked,
        }
    }
}

struct Shared<T: TerminalControl> {
    terminal: T,
    slot: Mutex<Slot<T::Attributes>>,
    restore_on_signal: bool,
    signals: Vec<i32>,
    auto_terminate: AtomicBool,
    last_signal: AtomicI32,
}

impl<T: TerminalControl> Shared<T> {
    /// Re-reads the terminal and forces only the echo bit back to `saved`.
    fn restore_echo(&self, saved: &T::Attributes) -> Result<()> {
        let mut current = self
            .terminal
            .attributes()
            .map_err(TermError::AttributeRead)?;
        current.set_echo(saved.echo());
        self.terminal
            .set_attributes(&current)
            .map_err(TermError::AttributeWrite)
    }

    /// Watcher callback. Failures have nobody to report to and are logged.
    ///
    /// The signal is recorded under the slot mutex so a concurrent `lock`
    /// cannot clear it after the fact.
    fn restore_after_signal(&self, signal: i32) -> Disposition {
        let watcher = {
            let mut slot = mutex_lock_or_recover(&self.slot);
            self.last_signal.store(signal, Ordering::SeqCst);
            match mem::replace(&mut *slot, Slot::Unlocked) {
                Slot::Locked { saved, watcher } => {
                    match self.restore_echo(&saved) {
                        Ok(()) => debug!(signal, "Terminal echo restored after signal"),
                        Err(e) => {
                            warn!(signal, error = %e, "Failed to restore terminal echo after signal");
                            *slot = Slot::Locked {
                                saved,
                                watcher: None,
                            };
                        }
                    }
                    watcher
                }
                Slot::Unlocked => None,
            }
        };
        drop(watcher);

        if self.auto_terminate.load(Ordering::SeqCst) {
            Disposition::Terminate
        } else {
            Disposition::Consume
        }
    }
}

/// Disables keyboard echo on a terminal and guarantees it comes back.
pub struct EchoGuard<T: TerminalControl> {
    shared: Arc<Shared<T>>,
}

impl<T: TerminalControl> EchoGuard<T> {
    /// Creates a guard configured from the environment.
    pub fn new(terminal: T) -> Self {
        Self::with_config(terminal, GuardConfig::from_env())
    }

    pub fn with_config(terminal: T, config: GuardConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                terminal,
                slot: Mutex::new(Slot::Unlocked),
                restore_on_signal: config.restore_on_signal,
                signals: config.signals,
                auto_terminate: AtomicBool::new(config.auto_terminate),
                last_signal: AtomicI32::new(NO_SIGNAL),
            }),
        }
    }

    pub fn state(&self) -> EchoState {
        mutex_lock_or_recover(&self.shared.slot).state()
    }

    pub fn is_locked(&self) -> bool {
        self.state() == EchoState::Locked
    }

    /// Whether the process exits after a watched signal restored echo.
    ///
    /// When disabled the signal is consumed and reported through
    /// [`interrupted_by`](Self::interrupted_by).
    pub fn set_auto_terminate(&self, enabled: bool) {
        self.shared.auto_terminate.store(enabled, Ordering::SeqCst);
    }

    /// The signal that restored echo since the last `lock`, if any.
    pub fn interrupted_by(&self) -> Option<i32> {
        match self.shared.last_signal.load(Ordering::SeqCst) {
            NO_SIGNAL => None,
            sig => Some(sig),
        }
    }

    /// Clears the echo bit and arms the signal watcher.
    ///
    /// On failure the terminal is left as it was and the guard stays
    /// unlocked.
    pub fn lock(&self) -> Result<()> {
        let shared = &self.shared;
        let mut slot = mutex_lock_or_recover(&shared.slot);
        if matches!(*slot, Slot::Locked { .. }) {
            return Err(TermError::InvalidStateTransition {
                operation: "lock",
                state: EchoState::Locked,
            });
        }

        let saved = shared
            .terminal
            .attributes()
            .map_err(TermError::AttributeRead)?;
        let mut muted = saved.clone();
        muted.set_echo(false);
        shared
            .terminal
            .set_attributes(&muted)
            .map_err(TermError::AttributeWrite)?;

        let watcher = if shared.restore_on_signal && !shared.signals.is_empty() {
            let weak = Arc::downgrade(shared);
            let armed = SignalWatcher::arm(&shared.signals, move |signal| {
                match weak.upgrade() {
                    Some(shared) => shared.restore_after_signal(signal),
                    None => Disposition::Terminate,
                }
            });
            match armed {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    if let Err(rollback) = shared.terminal.set_attributes(&saved) {
                        warn!(error = %rollback, "Failed to roll back terminal attributes");
                    }
                    return Err(e);
                }
            }
        } else {
            None
        };

        *slot = Slot::Locked { saved, watcher };
        shared.last_signal.store(NO_SIGNAL, Ordering::SeqCst);
        debug!("Terminal echo disabled");
        Ok(())
    }

    /// Restores the echo bit to its pre-lock value and disarms the watcher.
    ///
    /// Flags changed by others while locked are preserved. On failure the
    /// guard stays locked and the watcher stays armed.
    pub fn unlock(&self) -> Result<()> {
        let watcher = {
            let mut slot = mutex_lock_or_recover(&self.shared.slot);
            match &*slot {
                Slot::Unlocked => {
                    return Err(TermError::InvalidStateTransition {
                        operation: "unlock",
                        state: EchoState::Unlocked,
                    });
                }
                Slot::Locked { saved, .. } => self.shared.restore_echo(saved)?,
            }
            match mem::replace(&mut *slot, Slot::Unlocked) {
                Slot::Locked { watcher, .. } => watcher,
                Slot::Unlocked => None,
            }
        };

        if let Some(watcher) = watcher {
            watcher.disarm();
        }
        debug!("Terminal echo restored");
        Ok(())
    }

    /// Locks and returns a token that unlocks when released or dropped.
    pub fn lock_scoped(&self) -> Result<EchoLock<'_, T>> {
        self.lock()?;
        Ok(EchoLock {
            guard: self,
            released: false,
        })
    }
}

impl<T: TerminalControl> Drop for EchoGuard<T> {
    fn drop(&mut self) {
        if self.is_locked() {
            if let Err(e) = self.unlock() {
                warn!(error = %e, "Failed to restore terminal echo on drop");
            }
        }
    }
}

/// Scoped echo lock returned by [`EchoGuard::lock_scoped`].
#[must_use = "EchoLock must be held while echo should stay disabled; dropping it restores echo"]
pub struct EchoLock<'a, T: TerminalControl> {
    guard: &'a EchoGuard<T>,
    released: bool,
}

impl<T: TerminalControl> EchoLock<'_, T> {
    /// Unlocks now and reports the outcome.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.guard.unlock()
    }
}

impl<T: TerminalControl> Drop for EchoLock<'_, T> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match self.guard.unlock() {
            Ok(()) => {}
            // A watched signal got there first.
            Err(TermError::InvalidStateTransition { .. }) => {}
            Err(e) => warn!(error = %e, "Failed to restore terminal echo"),
        }
    }
}

static GLOBAL: OnceLock<EchoGuard<SystemTerminal>> = OnceLock::new();

/// Process-wide guard over standard input, created on first use.
pub fn global() -> &'static EchoGuard<SystemTerminal> {
    GLOBAL.get_or_init(|| EchoGuard::new(SystemTerminal::new()))
}

/// Disables echo on standard input through the process-wide guard.
pub fn lock_echo() -> Result<()> {
    global().lock()
}

/// Restores echo on standard input through the process-wide guard.
pub fn unlock_echo() -> Result<()> {
    global().unlock()
}
