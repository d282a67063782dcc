//! Ledger Engine CLI
//!
//! Command-line interface for replaying ledger command scripts.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > accounts.csv
//! cargo run -- --journal journal.csv commands.csv > accounts.csv
//! RUST_LOG=debug cargo run -- --log-format json commands.csv > accounts.csv
//! ```
//!
//! The program reads ledger commands from the input CSV file, applies them
//! through the ledger engine and outputs the final account states to stdout.
//! Logs and customer notifications are written to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, output not writable, etc.)

use ledger_engine::{cli, observability, replay};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;

fn main() {
    let args = cli::parse_args();
    observability::init(args.log_format);

    let mut journal = match args.journal.as_deref().map(File::create).transpose() {
        Ok(file) => file.map(BufWriter::new),
        Err(e) => {
            eprintln!("Error: Failed to create journal file: {}", e);
            process::exit(1);
        }
    };

    let mut output = std::io::stdout();
    let result = replay::process(
        &args.input_file,
        &mut output,
        journal.as_mut().map(|writer| writer as &mut dyn Write),
        args.delivery_timeout(),
    );

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Some(Err(e)) = journal.as_mut().map(|writer| writer.flush()) {
        eprintln!("Error: Failed to flush journal file: {}", e);
        process::exit(1);
    }
}
