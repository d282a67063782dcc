//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account records and account types
//! - `command`: Ledger commands read from replay scripts
//! - `customer`: Customer records referenced by accounts
//! - `transaction`: Transaction records and identifiers
//! - `error`: Error types for the ledger engine and its stores

pub mod account;
pub mod command;
pub mod customer;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountType, NewAccount};
pub use command::LedgerCommand;
pub use customer::Customer;
pub use error::{LedgerError, StorageError};
pub use transaction::{
    AccountId, CustomerId, NewTransaction, Transaction, TransactionId, TransactionType,
};
