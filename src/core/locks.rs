//! Per-account exclusive sections
//!
//! Every mutating ledger operation runs while holding the locks of all accounts
//! it touches. Locks are always taken in ascending account ID order, so two
//! operations over the same pair of accounts (e.g. opposite transfers) cannot
//! deadlock.
//!
//! A lock lives in the table only while some section holds or waits for it,
//! so lookups of unknown accounts leave nothing behind.

use crate::types::AccountId;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Table of per-account mutexes, created on first use and dropped when idle
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the locks of every account in `accounts`
    ///
    /// Duplicate IDs are locked once. The locks are released when `f`
    /// returns, and entries no other section still references are removed.
    ///
    /// # Arguments
    ///
    /// * `accounts` - The accounts the critical section covers
    /// * `f` - The critical section
    pub fn with_exclusive<R>(&self, accounts: &[AccountId], f: impl FnOnce() -> R) -> R {
        let mut ids = accounts.to_vec();
        ids.sort_unstable();
        ids.dedup();

        // Clone the handles out of the map so no shard lock is held while waiting
        let handles: Vec<Arc<Mutex<()>>> = ids
            .iter()
            .map(|id| Arc::clone(self.locks.entry(*id).or_default().value()))
            .collect();

        // The mutexes guard no data, so a panic in another section leaves
        // nothing inconsistent behind and poisoning can be ignored
        let guards: Vec<_> = handles
            .iter()
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner))
            .collect();

        let result = f();
        drop(guards);
        drop(handles);

        // Handles are cloned under the shard lock, so a count of 1 means no
        // other section holds or waits for this mutex
        for id in &ids {
            self.locks
                .remove_if(id, |_, lock| Arc::strong_count(lock) == 1);
        }
        result
    }

    /// Number of accounts with a live lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
