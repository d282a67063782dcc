//! Ledger commands read from a replay script

use super::account::AccountType;
use super::transaction::{AccountId, CustomerId};
use rust_decimal::Decimal;

/// One request to the ledger, as parsed from an input record
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Register a customer in the directory
    Register { name: String, email: String },

    /// Open an account for an existing customer
    Open {
        customer: CustomerId,
        account_type: AccountType,
    },

    /// Push funds from `from` to `to` (no fee, duplicate-guarded)
    Deposit {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },

    /// Withdraw funds from an account (fee charged)
    Withdraw { account: AccountId, amount: Decimal },

    /// Transfer funds out of a CURRENT account (fee charged)
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },

    /// Credit interest to a SAVINGS account
    Interest { account: AccountId },
}

impl LedgerCommand {
    /// Short operation name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::Register { .. } => "register",
            LedgerCommand::Open { .. } => "open",
            LedgerCommand::Deposit { .. } => "deposit",
            LedgerCommand::Withdraw { .. } => "withdraw",
            LedgerCommand::Transfer { .. } => "transfer",
            LedgerCommand::Interest { .. } => "interest",
        }
    }
}
