use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;

const LONG_ABOUT: &str = r#"ttyguard reports the size of the current terminal and can disable keyboard
echo on it while output is being redrawn.

Echo is always restored: on normal completion, or when the process receives
SIGINT, SIGQUIT, SIGTERM or SIGHUP while echo is disabled.

EXAMPLES:
    ttyguard size
    ttyguard width
    ttyguard hold --seconds 10
    ttyguard hold --seconds 10 --no-auto-terminate

ENVIRONMENT:
    RUST_LOG                    Log filter (default: warn; -v info, -vv debug)
    TTYGUARD_LOG                Write logs to this file instead of stderr
    TTYGUARD_AUTO_TERMINATE     Exit after a signal restored echo (default: 1)
    TTYGUARD_RESTORE_ON_SIGNAL  Watch signals while echo is disabled (default: 1)"#;

#[derive(Parser, Debug)]
#[command(name = "ttyguard")]
#[command(author, version)]
#[command(about = "Query terminal size and lock keyboard echo")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output; repeat for debug
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log level used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the terminal's rows and columns
    Size,

    /// Print the terminal's column count
    Width,

    /// Disable echo on standard input for a while, then restore it
    Hold {
        /// How long to keep echo disabled
        #[arg(short, long, default_value_t = 5)]
        seconds: u64,

        /// On a watched signal, restore echo and keep running instead of exiting
        #[arg(long)]
        no_auto_terminate: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        let cli = Cli::try_parse_from(["ttyguard", "size"]).unwrap();
        assert_eq!(cli.command, Commands::Size);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_parse_hold_defaults() {
        let cli = Cli::try_parse_from(["ttyguard", "hold"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Hold {
                seconds: 5,
                no_auto_terminate: false
            }
        );
    }

    #[test]
    fn test_parse_hold_flags() {
        let cli =
            Cli::try_parse_from(["ttyguard", "-v", "hold", "-s", "2", "--no-auto-terminate"])
                .unwrap();
        assert_eq!(cli.log_level(), "info");
        assert_eq!(
            cli.command,
            Commands::Hold {
                seconds: 2,
                no_auto_terminate: true
            }
        );
    }

    #[test]
    fn test_repeated_verbose_enables_debug() {
        let cli = Cli::try_parse_from(["ttyguard", "width", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["ttyguard"]).is_err());
    }
}
