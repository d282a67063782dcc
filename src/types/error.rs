//! Error types for the ledger engine
//!
//! This module defines every error that a ledger operation can surface.
//!
//! # Error Categories
//!
//! - **Lookup Errors**: Unknown accounts or customers
//! - **Business Rule Errors**: Insufficient funds, wrong account type, duplicate deposit
//! - **Input Errors**: Non-positive or sub-cent amounts, same-account movements
//! - **Storage Errors**: The account store or transaction log failed a read or write
//!
//! Every error except `StorageFailure` is detected before the first write of an
//! operation, so a rejected operation never leaves partial state behind.

use crate::types::{AccountId, AccountType, CustomerId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Failure reported by an account store or transaction log implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused or failed a write
    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// Main error type for the ledger engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The referenced account has no record
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The account ID that was not found
        account: AccountId,
    },

    /// The referenced customer has no record
    #[error("Customer {customer} not found")]
    CustomerNotFound {
        /// The customer ID that was not found
        customer: CustomerId,
    },

    /// The customer holds no account of the requested type
    #[error("Customer {customer} has no {account_type} account")]
    NoAccountOfType {
        customer: CustomerId,
        account_type: AccountType,
    },

    /// A customer with the same email is already registered
    #[error("Customer with email '{email}' already exists")]
    CustomerAlreadyExists { email: String },

    /// The requested amount plus any fee exceeds the available balance
    ///
    /// The account state remains unchanged.
    #[error(
        "Insufficient funds in account {account}: available {available}, requested {requested}"
    )]
    InsufficientFunds {
        /// Account ID
        account: AccountId,
        /// Balance at the time of the check
        available: Decimal,
        /// Amount plus fee that would have been debited
        requested: Decimal,
    },

    /// The operation is not allowed for this account type
    ///
    /// Transfers may only leave CURRENT accounts and interest only
    /// accrues on SAVINGS accounts.
    #[error("{operation} is not allowed on {account_type} account {account}")]
    InvalidAccountType {
        account: AccountId,
        account_type: AccountType,
        operation: String,
    },

    /// A matching deposit was already recorded on the source account
    #[error("Duplicate transaction on account {account}: matches transaction {existing}")]
    DuplicateTransaction {
        /// Source account ID
        account: AccountId,
        /// The previously recorded transaction
        existing: TransactionId,
    },

    /// Amount is not positive or has more than two decimal places
    #[error("Invalid amount '{amount}'")]
    InvalidAmount { amount: Decimal },

    /// Source and destination of a two-account operation are the same
    #[error("{operation} from account {account} to itself is not allowed")]
    SameAccount {
        account: AccountId,
        operation: String,
    },

    /// Decimal arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account ID
        account: AccountId,
    },

    /// The account store or transaction log failed
    ///
    /// No partially-applied state remains: either every write of the
    /// operation became visible or none did.
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] StorageError),
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    /// Create a CustomerNotFound error
    pub fn customer_not_found(customer: CustomerId) -> Self {
        LedgerError::CustomerNotFound { customer }
    }

    /// Create a NoAccountOfType error
    pub fn no_account_of_type(customer: CustomerId, account_type: AccountType) -> Self {
        LedgerError::NoAccountOfType {
            customer,
            account_type,
        }
    }

    /// Create a CustomerAlreadyExists error
    pub fn customer_already_exists(email: &str) -> Self {
        LedgerError::CustomerAlreadyExists {
            email: email.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            available,
            requested,
        }
    }

    /// Create an InvalidAccountType error
    pub fn invalid_account_type(
        account: AccountId,
        account_type: AccountType,
        operation: &str,
    ) -> Self {
        LedgerError::InvalidAccountType {
            account,
            account_type,
            operation: operation.to_string(),
        }
    }

    /// Create a DuplicateTransaction error
    pub fn duplicate_transaction(account: AccountId, existing: TransactionId) -> Self {
        LedgerError::DuplicateTransaction { account, existing }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create a SameAccount error
    pub fn same_account(account: AccountId, operation: &str) -> Self {
        LedgerError::SameAccount {
            account,
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }
}
