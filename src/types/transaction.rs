//! Transaction-related types for the ledger engine
//!
//! This module defines identifiers, transaction types and the immutable
//! transaction records that make up each account's audit trail.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// Account identifier, assigned by the account store
pub type AccountId = u64;

/// Customer identifier, assigned by the customer directory
pub type CustomerId = u64;

/// Transaction identifier, assigned by the transaction log
pub type TransactionId = u64;

/// Kinds of balance-affecting events recorded in the transaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Credit received from another account through a deposit
    Deposit,

    /// Debit from a withdrawal, or the source side of a deposit
    Withdrawal,

    /// Either side of a CURRENT-account transfer
    Transfer,

    /// Interest credited to a SAVINGS account
    Interest,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "deposit"),
            TransactionType::Withdrawal => write!(f, "withdrawal"),
            TransactionType::Transfer => write!(f, "transfer"),
            TransactionType::Interest => write!(f, "interest"),
        }
    }
}

/// Transaction record staged by the engine, before the log assigns an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The account whose balance this record affects
    pub account: AccountId,

    /// Signed balance delta (negative = debit, positive = credit)
    pub amount: Decimal,

    /// Fee included in `amount`, zero when the operation charges none
    pub fee: Decimal,

    pub transaction_type: TransactionType,

    pub description: String,

    pub timestamp: DateTime<Utc>,
}

impl NewTransaction {
    /// Create a fee-free record stamped with the current time
    pub fn new(
        account: AccountId,
        amount: Decimal,
        transaction_type: TransactionType,
        description: impl Into<String>,
    ) -> Self {
        NewTransaction {
            account,
            amount,
            fee: Decimal::ZERO,
            transaction_type,
            description: description.into(),
            timestamp: Utc::now(),
        }
    }

    /// Record the fee absorbed in this record's amount
    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = fee;
        self
    }

    /// Attach a log-assigned identifier
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            account: self.account,
            amount: self.amount,
            fee: self.fee,
            transaction_type: self.transaction_type,
            description: self.description,
            timestamp: self.timestamp,
        }
    }
}

/// Immutable entry of the audit trail
///
/// Written exactly once per balance-affecting operation (two per deposit or
/// transfer) and never updated or deleted afterwards. Summing `amount` over
/// an account's records and adding its opening balance yields its balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub account: AccountId,
    pub amount: Decimal,
    pub fee: Decimal,
    pub transaction_type: TransactionType,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}
