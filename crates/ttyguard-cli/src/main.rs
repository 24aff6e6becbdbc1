mod commands;
mod handlers;
mod telemetry;

use clap::Parser;

use commands::Cli;
use commands::Commands;
use telemetry::init_tracing;
use ttyguard::ErrorCategory;
use ttyguard::TermError;

/// EX_IOERR: the terminal refused the request
const EXIT_IO_ERROR: i32 = 74;
/// EX_SOFTWARE: internal or state-machine error
const EXIT_SOFTWARE: i32 = 70;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        eprintln!("Suggestion: {}", e.suggestion());
        std::process::exit(exit_code_for(&e));
    }
}

fn run() -> Result<(), TermError> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_level());

    match cli.command {
        Commands::Size => handlers::handle_size(),
        Commands::Width => handlers::handle_width(),
        Commands::Hold {
            seconds,
            no_auto_terminate,
        } => handlers::handle_hold(seconds, no_auto_terminate),
    }
}

fn exit_code_for(error: &TermError) -> i32 {
    match error.category() {
        ErrorCategory::External => EXIT_IO_ERROR,
        ErrorCategory::InvalidState | ErrorCategory::Internal => EXIT_SOFTWARE,
    }
}
