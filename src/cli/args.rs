use crate::observability::LogFormat;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Replay a script of ledger commands and print the resulting accounts
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(about = "Replay ledger commands and print the resulting account balances", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing ledger commands
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Optional path receiving the transaction journal
    #[arg(
        long = "journal",
        value_name = "PATH",
        help = "Write every transaction record to this CSV file"
    )]
    pub journal: Option<PathBuf>,

    /// Log line format
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        default_value = "text",
        help = "Log format on stderr: 'text' or 'json'"
    )]
    pub log_format: LogFormat,

    /// Upper bound for a single notification delivery, in seconds
    #[arg(
        long = "notification-timeout",
        value_name = "SECONDS",
        default_value_t = 5,
        help = "Seconds a single notification delivery may take"
    )]
    pub notification_timeout: u64,
}

impl CliArgs {
    /// Notification timeout as a Duration
    ///
    /// A value of zero falls back to one second, since a zero timeout would
    /// fail every delivery.
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout.max(1))
    }
}
