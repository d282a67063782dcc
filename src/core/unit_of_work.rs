//! Commit boundary for a single ledger operation
//!
//! A `UnitOfWork` collects the account updates and transaction records an
//! operation produces and writes them together:
//!
//! 1. updated accounts are written in one `put_all`
//! 2. the transaction records are appended in one `append_all`
//!
//! If step 2 fails, the account versions read at the start of the operation
//! are written back, so balances never disagree with the log. The caller must
//! hold the locks of every staged account for the whole lifetime of the unit.

use crate::core::traits::{AccountStore, TransactionLog};
use crate::types::{Account, LedgerError, NewTransaction};
use tracing::{debug, error, warn};

/// Staged writes of one ledger operation
pub struct UnitOfWork<'a> {
    accounts: &'a dyn AccountStore,
    log: &'a dyn TransactionLog,
    /// Account versions as read before the operation
    originals: Vec<Account>,
    updated: Vec<Account>,
    entries: Vec<NewTransaction>,
}

impl<'a> UnitOfWork<'a> {
    pub fn begin(accounts: &'a dyn AccountStore, log: &'a dyn TransactionLog) -> Self {
        Self {
            accounts,
            log,
            originals: Vec::new(),
            updated: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Stage an account update
    ///
    /// # Arguments
    ///
    /// * `original` - The account as read at the start of the operation
    /// * `updated` - The new version to write
    pub fn update_account(&mut self, original: &Account, updated: Account) {
        self.originals.push(original.clone());
        self.updated.push(updated);
    }

    /// Stage a transaction record
    pub fn record(&mut self, entry: NewTransaction) {
        self.entries.push(entry);
    }

    /// Write every staged change
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every account and record was written
    /// * `Err(LedgerError::StorageFailure)` - Nothing observable was written
    pub fn commit(self) -> Result<(), LedgerError> {
        self.accounts.put_all(&self.updated)?;

        match self.log.append_all(self.entries) {
            Ok(transactions) => {
                debug!(
                    transactions = ?transactions.iter().map(|tx| tx.id).collect::<Vec<_>>(),
                    "unit of work committed"
                );
                Ok(())
            }
            Err(cause) => {
                warn!(error = %cause, "transaction log write failed, restoring accounts");
                if let Err(restore) = self.accounts.put_all(&self.originals) {
                    error!(
                        error = %restore,
                        accounts = ?self.originals.iter().map(|a| a.id).collect::<Vec<_>>(),
                        "failed to restore accounts after log write failure"
                    );
                }
                Err(cause.into())
            }
        }
    }
}
