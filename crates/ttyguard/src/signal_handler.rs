//! Signal watching for echo restoration.
//!
//! One `signal-hook` iterator runs for the whole process on a dedicated
//! thread, started by the first lock that asks for signal restoration. The
//! async-signal handler only records the signal; restore callbacks run on
//! the dispatch thread as ordinary code.
//!
//! `signal-hook` never reinstalls the default disposition once it owns a
//! signal, so the dispatcher is never torn down. A signal that arrives
//! while no lock is armed for it gets its default action emulated, which
//! keeps Ctrl-C and friends working after every lock has been released.

#[cfg(unix)]
pub use self::unix::SignalWatcher;
#[cfg(unix)]
pub use self::unix::WATCHED_SIGNALS;

#[cfg(not(unix))]
pub use self::fallback::SignalWatcher;
#[cfg(not(unix))]
pub use self::fallback::WATCHED_SIGNALS;

/// What the dispatcher does with a signal after a restore callback ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Swallow the signal; the process keeps running.
    Consume,
    /// Carry out the signal's default action.
    Terminate,
}

#[cfg(unix)]
mod unix {
    use std::mem;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use std::thread;

    use signal_hook::consts::FORBIDDEN;
    use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
    use signal_hook::iterator::Handle;
    use signal_hook::iterator::Signals;
    use tracing::{debug, info, warn};

    use super::Disposition;
    use crate::error::TermError;
    use crate::sync::mutex_lock_or_recover;

    /// Interrupt, quit, terminate and hang-up. Kill and stop cannot be caught.
    pub const WATCHED_SIGNALS: &[i32] = &[SIGINT, SIGQUIT, SIGTERM, SIGHUP];

    type Callback = Box<dyn FnOnce(i32) -> Disposition + Send>;

    struct Armed {
        id: u64,
        signals: Vec<i32>,
        on_signal: Callback,
    }

    struct Dispatcher {
        handle: Handle,
        armed: Mutex<Vec<Armed>>,
        next_id: AtomicU64,
    }

    static DISPATCHER: Mutex<Option<&'static Dispatcher>> = Mutex::new(None);

    fn dispatcher() -> Result<&'static Dispatcher, TermError> {
        let mut slot = mutex_lock_or_recover(&DISPATCHER);
        if let Some(dispatcher) = *slot {
            return Ok(dispatcher);
        }
        let dispatcher = Dispatcher::start()?;
        *slot = Some(dispatcher);
        Ok(dispatcher)
    }

    fn installed() -> Option<&'static Dispatcher> {
        *mutex_lock_or_recover(&DISPATCHER)
    }

    impl Dispatcher {
        fn start() -> Result<&'static Self, TermError> {
            let mut signals = Signals::new(&[] as &[i32])
                .map_err(|e| TermError::SignalSetup(e.to_string()))?;
            let handle = signals.handle();

            let dispatcher: &'static Self = Box::leak(Box::new(Self {
                handle: handle.clone(),
                armed: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }));

            thread::Builder::new()
                .name("echo-restore".to_string())
                .spawn(move || {
                    for sig in signals.forever() {
                        dispatcher.dispatch(sig);
                    }
                })
                .map_err(|e| {
                    handle.close();
                    TermError::SignalSetup(format!("failed to spawn signal dispatcher: {}", e))
                })?;

            debug!("Signal dispatcher started");
            Ok(dispatcher)
        }

        /// Adding a signal twice is a no-op in `signal-hook`.
        fn register(&self, signals: &[i32]) -> Result<(), TermError> {
            for &sig in signals {
                self.handle
                    .add_signal(sig)
                    .map_err(|e| TermError::SignalSetup(format!("signal {}: {}", sig, e)))?;
            }
            Ok(())
        }

        fn dispatch(&self, sig: i32) {
            let fired: Vec<Armed> = {
                let mut armed = mutex_lock_or_recover(&self.armed);
                let (fired, keep) = mem::take(&mut *armed)
                    .into_iter()
                    .partition(|entry| entry.signals.contains(&sig));
                *armed = keep;
                fired
            };

            if fired.is_empty() {
                debug!(signal = sig, "No echo lock armed, applying default action");
                apply_default_action(sig);
                return;
            }

            let mut disposition = Disposition::Consume;
            for entry in fired {
                info!(signal = sig, watcher = entry.id, "Received signal, restoring terminal echo");
                if (entry.on_signal)(sig) == Disposition::Terminate {
                    disposition = Disposition::Terminate;
                }
            }
            if disposition == Disposition::Terminate {
                apply_default_action(sig);
            }
        }

        fn disarm(&self, id: u64) {
            mutex_lock_or_recover(&self.armed).retain(|entry| entry.id != id);
        }
    }

    /// Registration of a restore callback with the process-wide dispatcher.
    ///
    /// The callback runs at most once, for the first of its signals
    /// delivered while armed. Dropping the watcher disarms it.
    #[derive(Debug)]
    pub struct SignalWatcher {
        id: u64,
    }

    impl SignalWatcher {
        pub fn arm<F>(signals: &[i32], on_signal: F) -> Result<Self, TermError>
        where
            F: FnOnce(i32) -> Disposition + Send + 'static,
        {
            if let Some(sig) = signals.iter().find(|&&sig| FORBIDDEN.contains(&sig)) {
                return Err(TermError::SignalSetup(format!(
                    "signal {} cannot be caught",
                    sig
                )));
            }
            if let Some(sig) = signals.iter().find(|&&sig| sig <= 0 || sig >= 128) {
                return Err(TermError::SignalSetup(format!("invalid signal number {}", sig)));
            }

            let dispatcher = dispatcher()?;
            dispatcher.register(signals)?;

            let id = dispatcher.next_id.fetch_add(1, Ordering::Relaxed);
            mutex_lock_or_recover(&dispatcher.armed).push(Armed {
                id,
                signals: signals.to_vec(),
                on_signal: Box::new(on_signal),
            });
            debug!(watcher = id, "Signal watcher armed");
            Ok(Self { id })
        }

        /// Same as dropping the watcher.
        pub fn disarm(self) {
            drop(self);
        }

        #[cfg(test)]
        pub(crate) fn is_armed(&self) -> bool {
            installed().is_some_and(|d| {
                mutex_lock_or_recover(&d.armed)
                    .iter()
                    .any(|entry| entry.id == self.id)
            })
        }
    }

    impl Drop for SignalWatcher {
        fn drop(&mut self) {
            if let Some(dispatcher) = installed() {
                dispatcher.disarm(self.id);
                debug!(watcher = self.id, "Signal watcher disarmed");
            }
        }
    }

    /// Carries out the default action of `signal`. Returns only when that
    /// action does not end the process.
    fn apply_default_action(signal: i32) {
        if let Err(e) = signal_hook::low_level::emulate_default_handler(signal) {
            warn!(signal, error = %e, "Failed to emulate default signal action");
            std::process::exit(128 + signal);
        }
    }
}

#[cfg(not(unix))]
mod fallback {
    use super::Disposition;
    use crate::error::TermError;

    pub const WATCHED_SIGNALS: &[i32] = &[];

    #[derive(Debug)]
    pub struct SignalWatcher;

    impl SignalWatcher {
        pub fn arm<F>(_signals: &[i32], _on_signal: F) -> Result<Self, TermError>
        where
            F: FnOnce(i32) -> Disposition + Send + 'static,
        {
            Err(TermError::SignalSetup(
                "signal watching is not supported on this platform".to_string(),
            ))
        }

        pub fn disarm(self) {}
    }
}
