//! Core business logic module
//!
//! This module contains the ledger engine and the components it relies on:
//! - `traits` - Collaborator contracts (account store, transaction log, customers, events)
//! - `policy` - Fee, interest and rounding rules
//! - `engine` - Balance-mutation operations
//! - `locks` - Per-account critical sections
//! - `unit_of_work` - Commit boundary with rollback
//! - `account_store`, `transaction_log`, `customer_directory` - In-memory collaborators

pub mod account_store;
pub mod customer_directory;
pub mod engine;
pub mod locks;
pub mod policy;
pub mod traits;
pub mod transaction_log;
pub mod unit_of_work;

pub use account_store::InMemoryAccountStore;
pub use customer_directory::InMemoryCustomerDirectory;
pub use engine::LedgerEngine;
pub use locks::AccountLocks;
pub use traits::{AccountStore, CustomerDirectory, EventSink, TransactionLog};
pub use transaction_log::InMemoryTransactionLog;
pub use unit_of_work::UnitOfWork;
