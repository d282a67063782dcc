//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `command_reader` - Streaming command reader with iterator interface

pub mod command_reader;
pub mod csv_format;

pub use command_reader::CommandReader;
pub use csv_format::{convert_csv_record, write_accounts_csv, write_transactions_csv, CsvRecord};
