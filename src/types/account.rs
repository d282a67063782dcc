//! Account-related types for the ledger engine
//!
//! This module defines the Account structure and the account types a
//! customer can hold.

use super::transaction::{AccountId, CustomerId};
use crate::core::policy;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Kind of account, fixed at creation
///
/// The account type decides which operations are allowed against it:
/// only CURRENT accounts may be transfer sources and only SAVINGS accounts
/// accrue interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccountType {
    /// Everyday account, opened with a zero balance
    Current,

    /// Interest-bearing account, opened with the joining bonus
    Savings,
}

impl AccountType {
    /// Balance a freshly opened account of this type starts with
    pub fn opening_balance(self) -> Decimal {
        match self {
            AccountType::Current => Decimal::ZERO,
            AccountType::Savings => policy::SAVINGS_JOINING_BONUS,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Current => write!(f, "current"),
            AccountType::Savings => write!(f, "savings"),
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "current" => Ok(AccountType::Current),
            "savings" => Ok(AccountType::Savings),
            _ => Err(format!("Invalid account type: '{}'", s)),
        }
    }
}

/// Account state as held by the account store
///
/// Balances are mutated only by the ledger engine. The owner and the
/// account type never change after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Identifier assigned by the account store
    pub id: AccountId,

    /// The customer owning this account
    pub customer: CustomerId,

    /// The account type (CURRENT or SAVINGS)
    pub account_type: AccountType,

    /// Current balance
    ///
    /// Always non-negative and kept at the currency scale (2 decimal places).
    /// Equals the opening balance plus the signed sum of every transaction
    /// recorded against the account.
    pub balance: Decimal,
}

/// Account data before the store has assigned an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub customer: CustomerId,
    pub account_type: AccountType,
    pub balance: Decimal,
}

impl NewAccount {
    /// Create the record for a new account with its type's opening balance
    ///
    /// # Arguments
    ///
    /// * `customer` - The owner of the account
    /// * `account_type` - The account type
    ///
    /// # Returns
    ///
    /// A `NewAccount` with:
    /// - balance = 0 for CURRENT accounts
    /// - balance = 500 (joining bonus) for SAVINGS accounts
    pub fn opening(customer: CustomerId, account_type: AccountType) -> Self {
        NewAccount {
            customer,
            account_type,
            balance: account_type.opening_balance(),
        }
    }

    /// Attach a store-assigned identifier
    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            customer: self.customer,
            account_type: self.account_type,
            balance: self.balance,
        }
    }
}
