use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;
use ttyguard::Result;
use ttyguard::TermError;
use ttyguard::terminal_size;
use ttyguard::terminal_width;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn handle_size() -> Result<()> {
    let dims = terminal_size()?;
    println!("{} {}", dims.rows, dims.cols);
    Ok(())
}

pub fn handle_width() -> Result<()> {
    println!("{}", terminal_width()?);
    Ok(())
}

pub fn handle_hold(seconds: u64, no_auto_terminate: bool) -> Result<()> {
    let guard = ttyguard::global();
    if no_auto_terminate {
        guard.set_auto_terminate(false);
    }

    guard.lock()?;
    info!(seconds, "Holding terminal echo");
    eprintln!(
        "Echo disabled for {}s. Typed keys will not be shown; press Ctrl-C to interrupt.",
        seconds
    );
    let _ = io::stderr().flush();

    let deadline = Instant::now() + Duration::from_secs(seconds);
    while Instant::now() < deadline {
        if let Some(signal) = guard.interrupted_by() {
            eprintln!("Interrupted by signal {}; echo restored.", signal);
            return Ok(());
        }
        thread::sleep(POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now())));
    }

    match guard.unlock() {
        Ok(()) => {
            eprintln!("Echo restored.");
            Ok(())
        }
        // A signal arrived between the last poll and the deadline.
        Err(TermError::InvalidStateTransition { .. }) if guard.interrupted_by().is_some() => {
            Ok(())
        }
        Err(e) => Err(e),
    }
}
