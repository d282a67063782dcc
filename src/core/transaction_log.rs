//! Thread-safe in-memory transaction log
//!
//! This module provides the `InMemoryTransactionLog` struct, the append-only
//! audit trail of every balance-affecting event.
//!
//! # Design
//!
//! Records are grouped per account in a `DashMap<AccountId, Vec<Transaction>>`,
//! which keeps the duplicate lookup and the per-account history cheap.
//! Identifiers come from an atomic counter starting at 1. Records are never
//! updated or removed once appended.

use crate::core::traits::TransactionLog;
use crate::types::{AccountId, NewTransaction, StorageError, Transaction};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory append-only transaction log backed by `DashMap`
#[derive(Debug)]
pub struct InMemoryTransactionLog {
    /// Records by owning account, in append order
    entries: DashMap<AccountId, Vec<Transaction>>,

    /// Next identifier to hand out
    next_id: AtomicU64,
}

impl InMemoryTransactionLog {
    /// Create a new empty log
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Every record in the log, ordered by transaction ID
    pub fn all(&self) -> Vec<Transaction> {
        let mut all: Vec<Transaction> = self
            .entries
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|tx| tx.id);
        all
    }
}

impl Default for InMemoryTransactionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionLog for InMemoryTransactionLog {
    fn append_all(&self, entries: Vec<NewTransaction>) -> Result<Vec<Transaction>, StorageError> {
        let mut written = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let transaction = entry.with_id(id);
            self.entries
                .entry(transaction.account)
                .or_default()
                .push(transaction.clone());
            written.push(transaction);
        }
        Ok(written)
    }

    fn find_duplicate(
        &self,
        account: AccountId,
        amount: Decimal,
        description: &str,
    ) -> Result<Option<Transaction>, StorageError> {
        Ok(self.entries.get(&account).and_then(|history| {
            history
                .iter()
                .find(|tx| tx.amount == amount && tx.description == description)
                .cloned()
        }))
    }

    fn for_account(&self, account: AccountId) -> Result<Vec<Transaction>, StorageError> {
        Ok(self
            .entries
            .get(&account)
            .map(|history| history.value().clone())
            .unwrap_or_default())
    }
}
