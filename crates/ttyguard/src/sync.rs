use std::sync::Mutex;
use std::sync::MutexGuard;

use tracing::warn;

/// Locks `lock`, taking over the state if a previous holder panicked.
///
/// The guarded echo state stays meaningful after a panic elsewhere, and a
/// poisoned lock must not stop the terminal from being restored.
pub(crate) fn mutex_lock_or_recover<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!("Recovering from poisoned echo state mutex");
        poisoned.into_inner()
    })
}
