//! Ledger Engine Library
//! # Overview
//!
//! This library provides a concurrent ledger for customer CURRENT and SAVINGS
//! accounts: balance mutations, fees, interest accrual, duplicate detection
//! and an append-only transaction log.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, LedgerError, etc.)
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Balance-mutation operations
//!   - [`core::policy`] - Fee, interest and rounding rules
//!   - [`core::locks`] - Per-account critical sections
//!   - [`core::unit_of_work`] - Commit boundary with rollback
//!   - [`core::traits`] - Collaborator contracts (stores, customer directory, event sink)
//! - [`notify`] - Balance-change events and customer notifications
//! - [`io`] - CSV command reader and output writers
//! - [`replay`] - Drives the engine from a command script
//! - [`cli`] - CLI arguments parsing
//! - [`observability`] - Tracing initialization
//!
//! # Operations
//!
//! - **Open**: Create an account (SAVINGS accounts start with a 500 joining bonus)
//! - **Deposit**: Push funds between two accounts, no fee, duplicate-guarded
//! - **Withdraw**: Debit an account, charging a 0.05% fee
//! - **Transfer**: Move funds out of a CURRENT account, charging a 0.05% fee
//! - **Interest**: Credit 0.5% interest to a SAVINGS account
//!
//! # Invariants
//!
//! - Balances never go negative
//! - `balance == opening balance + sum of the account's transaction amounts`
//! - A rejected operation changes nothing

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod notify;
pub mod observability;
pub mod replay;
pub mod types;

pub use core::{
    InMemoryAccountStore, InMemoryCustomerDirectory, InMemoryTransactionLog, LedgerEngine,
};
pub use io::{write_accounts_csv, write_transactions_csv};
pub use replay::{process, Replay, ReplaySummary};
pub use types::{
    Account, AccountId, AccountType, Customer, CustomerId, LedgerCommand, LedgerError,
    Transaction, TransactionId, TransactionType,
};
