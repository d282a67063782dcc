//! Events published by the ledger engine after a committed balance change

use crate::types::{AccountId, CustomerId};
use rust_decimal::Decimal;

/// What happened to the account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceChange {
    /// Funds pushed to another account through a deposit
    DepositSent { to: AccountId },
    /// Funds received through a deposit
    DepositReceived { from: AccountId },
    Withdrawn,
    TransferSent { to: AccountId },
    TransferReceived { from: AccountId },
    InterestCredited,
}

/// A committed change to one account's balance
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceChanged {
    pub account: AccountId,
    /// Owner of the account, the addressee of any notification
    pub customer: CustomerId,
    pub change: BalanceChange,
    /// Amount requested by the caller (or interest credited), excluding fees
    pub amount: Decimal,
    /// Fee charged on top of `amount`
    pub fee: Decimal,
    /// Balance after the change
    pub balance: Decimal,
}

/// Message delivered to a customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl BalanceChanged {
    /// Customer-facing message for this event
    ///
    /// Deposits are not notified, so `None` is returned for both of their sides.
    pub fn notification(&self) -> Option<Notification> {
        let (subject, body) = match self.change {
            BalanceChange::DepositSent { .. } | BalanceChange::DepositReceived { .. } => {
                return None
            }
            BalanceChange::Withdrawn => (
                "Withdrawal Notification",
                format!(
                    "Amount of {} withdrawn. Transaction fee of {} applied.",
                    self.amount, self.fee
                ),
            ),
            BalanceChange::TransferSent { to } => (
                "Transfer Notification",
                format!("Amount of {} transferred to Account ID: {}", self.amount, to),
            ),
            BalanceChange::TransferReceived { from } => (
                "Transfer Notification",
                format!("Amount of {} received from Account ID: {}", self.amount, from),
            ),
            BalanceChange::InterestCredited => (
                "Interest Credit Notification",
                format!(
                    "An interest of {} has been credited to your Savings account.",
                    self.amount
                ),
            ),
        };

        Some(Notification {
            subject: subject.to_string(),
            body,
        })
    }
}
