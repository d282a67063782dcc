//! Streaming CSV reader for ledger command scripts
//!
//! Yields one `Result<LedgerCommand, String>` per CSV row. Conversion is
//! delegated to the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `open()`
//! - Individual row errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging
//!
//! ```no_run
//! use ledger_engine::io::CommandReader;
//! use std::path::Path;
//!
//! let reader = CommandReader::open(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Applying {}", command.name()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerCommand;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streaming command reader over any `Read` source
#[derive(Debug)]
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
    line_num: usize,
}

impl CommandReader<File> {
    /// Open a command script from a file path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    ///
    /// # Returns
    ///
    /// * `Ok(CommandReader)` if the file opened successfully
    /// * `Err(String)` if the file could not be opened
    pub fn open(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> CommandReader<R> {
    /// Wrap an arbitrary reader
    ///
    /// The CSV reader trims whitespace and allows short rows, since most
    /// operations leave trailing columns empty.
    pub fn from_reader(source: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(source);

        Self {
            reader,
            line_num: 0,
        }
    }
}

impl<R: Read> Iterator for CommandReader<R> {
    type Item = Result<LedgerCommand, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;

        // +1 for the header row
        let line = self.line_num + 1;
        Some(match row {
            Ok(csv_record) => {
                convert_csv_record(csv_record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountType;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "op,customer,account,counterparty,amount,name,email\n";

    fn reader(body: &str) -> CommandReader<std::io::Cursor<Vec<u8>>> {
        CommandReader::from_reader(std::io::Cursor::new(format!("{}{}", HEADER, body).into_bytes()))
    }

    #[test]
    fn test_open_reads_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "{}open_current,1,,,,,\n", HEADER).expect("Failed to write temp file");
        file.flush().expect("Failed to flush temp file");

        let commands: Vec<_> = CommandReader::open(file.path()).unwrap().collect();

        assert_eq!(
            commands,
            vec![Ok(LedgerCommand::Open {
                customer: 1,
                account_type: AccountType::Current
            })]
        );
    }

    #[test]
    fn test_open_fails_on_missing_file() {
        let result = CommandReader::open(Path::new("nonexistent.csv"));

        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_reads_mixed_rows_in_order() {
        let commands: Vec<_> = reader(
            "register,,,,,Jane,jane@example.com\n\
             withdraw,,1,,25.50,,\n\
             interest,,2,,,,\n",
        )
        .collect();

        assert_eq!(
            commands,
            vec![
                Ok(LedgerCommand::Register {
                    name: "Jane".to_string(),
                    email: "jane@example.com".to_string()
                }),
                Ok(LedgerCommand::Withdraw {
                    account: 1,
                    amount: Decimal::new(2550, 2)
                }),
                Ok(LedgerCommand::Interest { account: 2 }),
            ]
        );
    }

    #[test]
    fn test_short_rows_are_accepted() {
        let commands: Vec<_> = reader("interest,,3\n").collect();

        assert_eq!(commands, vec![Ok(LedgerCommand::Interest { account: 3 })]);
    }

    #[test]
    fn test_errors_carry_line_numbers_and_do_not_stop_iteration() {
        let commands: Vec<_> = reader(
            "withdraw,,abc,,1,,\n\
             teleport,,1,,1,,\n\
             interest,,2,,,,\n",
        )
        .collect();

        assert_eq!(commands.len(), 3);
        assert!(commands[0].as_ref().unwrap_err().starts_with("Line 2: CSV parse error"));
        assert!(commands[1].as_ref().unwrap_err().starts_with("Line 3: Invalid operation"));
        assert_eq!(commands[2], Ok(LedgerCommand::Interest { account: 2 }));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let commands: Vec<_> = reader(" transfer , , 1 , 2 , 10.00 , , \n").collect();

        assert_eq!(
            commands,
            vec![Ok(LedgerCommand::Transfer {
                from: 1,
                to: 2,
                amount: Decimal::new(1000, 2)
            })]
        );
    }
}
