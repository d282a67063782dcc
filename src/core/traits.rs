//! Collaborator traits consumed by the ledger engine
//!
//! This module defines the contracts the engine relies on for persistence,
//! customer lookup and event emission. Implementations must be `Send + Sync`
//! so a single engine can be shared across threads; the engine holds them as
//! `Arc<dyn Trait>`, so any backing store (in-memory, relational, embedded)
//! can be plugged in.

use crate::notify::BalanceChanged;
use crate::types::{
    Account, AccountId, AccountType, Customer, CustomerId, NewAccount, NewTransaction,
    StorageError, Transaction,
};
use rust_decimal::Decimal;

/// Keyed store of account records
///
/// The store owns the canonical account state. The engine reads a copy,
/// validates against it and writes back the updated version while holding the
/// account's lock, so implementations need no additional concurrency control
/// beyond being safe to call from multiple threads.
pub trait AccountStore: Send + Sync {
    /// Get an account by ID
    fn get(&self, id: AccountId) -> Result<Option<Account>, StorageError>;

    /// Insert a new account and assign its identifier
    fn create(&self, account: NewAccount) -> Result<Account, StorageError>;

    /// Update an existing account in place
    fn put(&self, account: &Account) -> Result<(), StorageError>;

    /// Update several accounts in one write
    ///
    /// Either every account is updated or none is.
    fn put_all(&self, accounts: &[Account]) -> Result<(), StorageError>;

    /// Find the account a customer holds of the given type
    ///
    /// If the customer holds several accounts of that type the one with
    /// the lowest identifier is returned.
    fn find_by_owner_and_type(
        &self,
        customer: CustomerId,
        account_type: AccountType,
    ) -> Result<Option<Account>, StorageError>;
}

/// Append-only store of transaction records
pub trait TransactionLog: Send + Sync {
    /// Append a batch of records, assigning identifiers in order
    ///
    /// Either every record is appended or none is.
    fn append_all(&self, entries: Vec<NewTransaction>) -> Result<Vec<Transaction>, StorageError>;

    /// Find a record on `account` with exactly this amount and description
    fn find_duplicate(
        &self,
        account: AccountId,
        amount: Decimal,
        description: &str,
    ) -> Result<Option<Transaction>, StorageError>;

    /// All records of an account, oldest first
    fn for_account(&self, account: AccountId) -> Result<Vec<Transaction>, StorageError>;
}

/// Read access to customer records
pub trait CustomerDirectory: Send + Sync {
    /// Get a customer by ID
    fn get(&self, id: CustomerId) -> Option<Customer>;
}

/// Receiver of balance-change events published after each commit
///
/// Publishing must not block and cannot fail the operation that emitted the
/// event; implementations log delivery problems themselves.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: BalanceChanged);
}
