//! Thread-safe in-memory account store
//!
//! This module provides the `InMemoryAccountStore` struct, which keeps account
//! records in a concurrent map so the engine can be shared across threads.
//!
//! # Design
//!
//! The store uses `DashMap` (a concurrent HashMap) with fine-grained locking
//! per shard. Identifiers are assigned from an atomic counter starting at 1,
//! so accounts are numbered in creation order.
//!
//! # Thread Safety
//!
//! Every read returns a clone taken while holding the entry's shard lock, so a
//! reader never observes a half-written record. Multi-account consistency is
//! the engine's concern (see `core::locks`).

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, AccountType, CustomerId, NewAccount, StorageError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// In-memory account store backed by `DashMap`
#[derive(Debug)]
pub struct InMemoryAccountStore {
    /// Concurrent HashMap storing account states by account ID
    accounts: DashMap<AccountId, Account>,

    /// Next identifier to hand out
    next_id: AtomicU64,
}

impl InMemoryAccountStore {
    /// Create a new empty store
    ///
    /// # Returns
    ///
    /// A new `InMemoryAccountStore` with no accounts. The first created
    /// account receives ID 1.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Get all accounts, sorted by account ID
    ///
    /// The returned vector is a snapshot; accounts may be created or modified
    /// by other threads after this method returns.
    pub fn get_all_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, id: AccountId) -> Result<Option<Account>, StorageError> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    fn create(&self, account: NewAccount) -> Result<Account, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let account = account.with_id(id);
        self.accounts.insert(id, account.clone());
        trace!(account = id, "account created");
        Ok(account)
    }

    fn put(&self, account: &Account) -> Result<(), StorageError> {
        match self.accounts.get_mut(&account.id) {
            Some(mut entry) => {
                *entry.value_mut() = account.clone();
                Ok(())
            }
            None => Err(StorageError::WriteFailed(format!(
                "account {} does not exist",
                account.id
            ))),
        }
    }

    fn put_all(&self, accounts: &[Account]) -> Result<(), StorageError> {
        // Validate every key first so a missing account leaves nothing written
        if let Some(missing) = accounts.iter().find(|a| !self.accounts.contains_key(&a.id)) {
            return Err(StorageError::WriteFailed(format!(
                "account {} does not exist",
                missing.id
            )));
        }
        for account in accounts {
            self.put(account)?;
        }
        Ok(())
    }

    fn find_by_owner_and_type(
        &self,
        customer: CustomerId,
        account_type: AccountType,
    ) -> Result<Option<Account>, StorageError> {
        Ok(self
            .accounts
            .iter()
            .filter(|entry| {
                entry.value().customer == customer && entry.value().account_type == account_type
            })
            .map(|entry| entry.value().clone())
            .min_by_key(|account| account.id))
    }
}
