//! Ledger engine: balance-mutation rules and audit trail
//!
//! This module provides the `LedgerEngine` struct, which opens accounts and
//! applies deposits, withdrawals, transfers and interest accrual.
//!
//! # Operation Flow
//!
//! Every mutating operation follows the same sequence:
//!
//! 1. Validate the amount (before touching any store)
//! 2. Lock every account involved, in ascending ID order
//! 3. Read the accounts and check the business rules
//! 4. Stage the updated accounts and transaction records in a `UnitOfWork`
//!    and commit them as one unit
//! 5. Publish `BalanceChanged` events, then release the locks
//!
//! All business-rule failures happen in steps 1 to 3, so a rejected operation
//! writes nothing. Step 4 can only fail with `StorageFailure`, in which case
//! the unit of work leaves no partial state behind.
//!
//! # Fees and Duplicate Detection
//!
//! Withdrawals and transfers charge a 0.05% fee and have no duplicate guard.
//! Deposits charge no fee but refuse to repeat a movement already recorded on
//! the source account with the same amount and destination.
//!
//! # Thread Safety
//!
//! `LedgerEngine` is `Send + Sync`; share it through an `Arc` and call it from
//! any number of threads. Operations touching disjoint accounts run in parallel.
//! Events are published inside the critical section, so the events of one
//! account reach the sink in commit order.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::core::locks::AccountLocks;
use crate::core::policy;
use crate::core::traits::{AccountStore, CustomerDirectory, EventSink, TransactionLog};
use crate::core::unit_of_work::UnitOfWork;
use crate::notify::{BalanceChange, BalanceChanged};
use crate::types::{
    Account, AccountId, AccountType, CustomerId, LedgerError, NewAccount, NewTransaction,
    Transaction, TransactionType,
};

/// Result of a critical section: the account handed back to the caller and
/// the events to publish before the locks are released
type Outcome = (Account, Vec<BalanceChanged>);

/// The ledger transaction engine
///
/// # Architecture
///
/// ```text
/// LedgerEngine
///     ├── Arc<dyn AccountStore>       (canonical account state)
///     ├── Arc<dyn TransactionLog>     (append-only audit trail)
///     ├── Arc<dyn CustomerDirectory>  (account opening checks)
///     ├── Arc<dyn EventSink>          (post-commit balance events)
///     └── AccountLocks                (per-account critical sections)
/// ```
pub struct LedgerEngine {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionLog>,
    customers: Arc<dyn CustomerDirectory>,
    events: Arc<dyn EventSink>,
    locks: AccountLocks,
}

impl LedgerEngine {
    /// Create a new LedgerEngine
    ///
    /// # Arguments
    ///
    /// * `accounts` - Store holding the account records
    /// * `transactions` - Log receiving the transaction records
    /// * `customers` - Directory used to validate account owners
    /// * `events` - Sink receiving a `BalanceChanged` event after each commit
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        transactions: Arc<dyn TransactionLog>,
        customers: Arc<dyn CustomerDirectory>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            accounts,
            transactions,
            customers,
            events,
            locks: AccountLocks::new(),
        }
    }

    /// Open a new account for a customer
    ///
    /// CURRENT accounts start at 0, SAVINGS accounts start with the joining
    /// bonus. The opening balance is part of the initial state, so no
    /// transaction is recorded for it.
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The persisted account with its assigned ID
    /// * `Err(LedgerError::CustomerNotFound)` - If the customer is unknown
    #[instrument(skip(self))]
    pub fn open_account(
        &self,
        customer: CustomerId,
        account_type: AccountType,
    ) -> Result<Account, LedgerError> {
        if self.customers.get(customer).is_none() {
            debug!("account opening rejected: unknown customer");
            return Err(LedgerError::customer_not_found(customer));
        }

        let account = self
            .accounts
            .create(NewAccount::opening(customer, account_type))?;

        info!(account = account.id, balance = %account.balance, "account opened");
        Ok(account)
    }

    /// Get an account by ID
    ///
    /// Reads under the account's lock, so the returned state is always a
    /// committed one. Never mutates anything.
    pub fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.locks.with_exclusive(&[id], || self.load(id))
    }

    /// Find the account a customer holds of the given type
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The account (lowest ID if the customer holds several)
    /// * `Err(LedgerError::CustomerNotFound)` - If the customer is unknown
    /// * `Err(LedgerError::NoAccountOfType)` - If the customer holds no such account
    pub fn find_account(
        &self,
        customer: CustomerId,
        account_type: AccountType,
    ) -> Result<Account, LedgerError> {
        if self.customers.get(customer).is_none() {
            return Err(LedgerError::customer_not_found(customer));
        }

        let found = self
            .accounts
            .find_by_owner_and_type(customer, account_type)?
            .ok_or_else(|| LedgerError::no_account_of_type(customer, account_type))?;

        self.get_account(found.id)
    }

    /// Audit trail of an account, oldest record first
    pub fn transactions(&self, id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        self.locks.with_exclusive(&[id], || {
            self.load(id)?;
            Ok(self.transactions.for_account(id)?)
        })
    }

    /// Push funds from one account to another
    ///
    /// Debits `amount` from the source and credits it to the destination,
    /// without a fee. Records a WITHDRAWAL on the source
    /// (`"Deposit to Account ID: <to>"`) and a DEPOSIT on the destination
    /// (`"Deposit from Account ID: <from>"`).
    ///
    /// If the source already carries a record with the same amount and
    /// description, the deposit is refused as a duplicate and nothing is written.
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The updated destination account
    /// * `Err(LedgerError::InvalidAmount)` - If the amount is not a positive cent amount
    /// * `Err(LedgerError::SameAccount)` - If source and destination are the same
    /// * `Err(LedgerError::AccountNotFound)` - If either account is unknown
    /// * `Err(LedgerError::DuplicateTransaction)` - If the deposit was already applied
    /// * `Err(LedgerError::InsufficientFunds)` - If the source balance is below `amount`
    #[instrument(skip(self))]
    pub fn deposit(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<Account, LedgerError> {
        let amount = Self::validate_amount(amount)?;
        if from == to {
            return Err(LedgerError::same_account(from, "deposit"));
        }

        self.exclusive("deposit", &[from, to], || {
            let source = self.load(from)?;
            let destination = self.load(to)?;

            let debit = -amount;
            let debit_description = format!("Deposit to Account ID: {}", to);
            if let Some(existing) =
                self.transactions
                    .find_duplicate(from, debit, &debit_description)?
            {
                return Err(LedgerError::duplicate_transaction(from, existing.id));
            }

            if source.balance < amount {
                return Err(LedgerError::insufficient_funds(from, source.balance, amount));
            }

            let mut debited = source.clone();
            debited.balance = source
                .balance
                .checked_sub(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", from))?;
            let mut credited = destination.clone();
            credited.balance = destination
                .balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", to))?;

            let mut unit = UnitOfWork::begin(self.accounts.as_ref(), self.transactions.as_ref());
            unit.update_account(&source, debited.clone());
            unit.update_account(&destination, credited.clone());
            unit.record(NewTransaction::new(
                from,
                debit,
                TransactionType::Withdrawal,
                debit_description,
            ));
            unit.record(NewTransaction::new(
                to,
                amount,
                TransactionType::Deposit,
                format!("Deposit from Account ID: {}", from),
            ));
            unit.commit()?;

            let events = vec![
                BalanceChanged {
                    account: from,
                    customer: debited.customer,
                    change: BalanceChange::DepositSent { to },
                    amount,
                    fee: Decimal::ZERO,
                    balance: debited.balance,
                },
                BalanceChanged {
                    account: to,
                    customer: credited.customer,
                    change: BalanceChange::DepositReceived { from },
                    amount,
                    fee: Decimal::ZERO,
                    balance: credited.balance,
                },
            ];
            Ok((credited, events))
        })
    }

    /// Withdraw funds from an account
    ///
    /// Charges a fee of `amount * 0.0005` computed at full precision. The
    /// account must hold at least `amount + fee`. The new balance is rounded
    /// half-up to two decimal places, and the single WITHDRAWAL record carries
    /// the resulting signed balance delta (fee included).
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The updated account
    /// * `Err(LedgerError::InvalidAmount)` - If the amount is not a positive cent amount
    /// * `Err(LedgerError::AccountNotFound)` - If the account is unknown
    /// * `Err(LedgerError::InsufficientFunds)` - If the balance is below `amount + fee`
    #[instrument(skip(self))]
    pub fn withdraw(&self, id: AccountId, amount: Decimal) -> Result<Account, LedgerError> {
        let amount = Self::validate_amount(amount)?;

        self.exclusive("withdraw", &[id], || {
            let account = self.load(id)?;
            let debited = Self::debit_with_fee(&account, amount, "withdraw")?;
            let delta = debited.balance - account.balance;
            let fee = -delta - amount;

            let mut unit = UnitOfWork::begin(self.accounts.as_ref(), self.transactions.as_ref());
            unit.update_account(&account, debited.clone());
            unit.record(
                NewTransaction::new(id, delta, TransactionType::Withdrawal, "Withdrawal")
                    .with_fee(fee),
            );
            unit.commit()?;

            let event = BalanceChanged {
                account: id,
                customer: debited.customer,
                change: BalanceChange::Withdrawn,
                amount,
                fee,
                balance: debited.balance,
            };
            Ok((debited, vec![event]))
        })
    }

    /// Transfer funds out of a CURRENT account
    ///
    /// Debits `amount + fee` from the source (rounded half-up to two decimal
    /// places) and credits `amount` to the destination; the fee is retained.
    /// Records one TRANSFER on each side. Unlike deposits, transfers have no
    /// duplicate guard.
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The updated destination account
    /// * `Err(LedgerError::InvalidAmount)` - If the amount is not a positive cent amount
    /// * `Err(LedgerError::SameAccount)` - If source and destination are the same
    /// * `Err(LedgerError::AccountNotFound)` - If either account is unknown
    /// * `Err(LedgerError::InvalidAccountType)` - If the source is not a CURRENT account
    /// * `Err(LedgerError::InsufficientFunds)` - If the source balance is below `amount + fee`
    #[instrument(skip(self))]
    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<Account, LedgerError> {
        let amount = Self::validate_amount(amount)?;
        if from == to {
            return Err(LedgerError::same_account(from, "transfer"));
        }

        self.exclusive("transfer", &[from, to], || {
            let source = self.load(from)?;
            let destination = self.load(to)?;

            if source.account_type != AccountType::Current {
                return Err(LedgerError::invalid_account_type(
                    from,
                    source.account_type,
                    "transfer",
                ));
            }

            let debited = Self::debit_with_fee(&source, amount, "transfer")?;
            let delta = debited.balance - source.balance;
            let fee = -delta - amount;

            let mut credited = destination.clone();
            credited.balance = destination
                .balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", to))?;

            let mut unit = UnitOfWork::begin(self.accounts.as_ref(), self.transactions.as_ref());
            unit.update_account(&source, debited.clone());
            unit.update_account(&destination, credited.clone());
            unit.record(
                NewTransaction::new(
                    from,
                    delta,
                    TransactionType::Transfer,
                    format!("Transfer to Account ID: {}", to),
                )
                .with_fee(fee),
            );
            unit.record(NewTransaction::new(
                to,
                amount,
                TransactionType::Transfer,
                format!("Transfer from Account ID: {}", from),
            ));
            unit.commit()?;

            let events = vec![
                BalanceChanged {
                    account: from,
                    customer: debited.customer,
                    change: BalanceChange::TransferSent { to },
                    amount,
                    fee,
                    balance: debited.balance,
                },
                BalanceChanged {
                    account: to,
                    customer: credited.customer,
                    change: BalanceChange::TransferReceived { from },
                    amount,
                    fee: Decimal::ZERO,
                    balance: credited.balance,
                },
            ];
            Ok((credited, events))
        })
    }

    /// Credit interest to a SAVINGS account
    ///
    /// Interest is `balance * 0.005` rounded half-up to two decimal places.
    /// A non-positive balance leaves the account untouched: no record, no
    /// event, no error. Any positive balance gets a record and an event, even
    /// when the interest rounds to 0.00.
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The updated (or unchanged) account
    /// * `Err(LedgerError::AccountNotFound)` - If the account is unknown
    /// * `Err(LedgerError::InvalidAccountType)` - If the account is not a SAVINGS account
    #[instrument(skip(self))]
    pub fn apply_interest(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.exclusive("interest", &[id], || {
            let account = self.load(id)?;

            if account.account_type != AccountType::Savings {
                return Err(LedgerError::invalid_account_type(
                    id,
                    account.account_type,
                    "interest",
                ));
            }

            if account.balance <= Decimal::ZERO {
                return Ok((account, Vec::new()));
            }

            let interest = policy::accrued_interest(account.balance)
                .ok_or_else(|| LedgerError::arithmetic_overflow("interest", id))?;

            let mut credited = account.clone();
            credited.balance = account
                .balance
                .checked_add(interest)
                .ok_or_else(|| LedgerError::arithmetic_overflow("interest", id))?;

            let mut unit = UnitOfWork::begin(self.accounts.as_ref(), self.transactions.as_ref());
            unit.update_account(&account, credited.clone());
            unit.record(NewTransaction::new(
                id,
                interest,
                TransactionType::Interest,
                "Interest credited to Savings account",
            ));
            unit.commit()?;

            let event = BalanceChanged {
                account: id,
                customer: credited.customer,
                change: BalanceChange::InterestCredited,
                amount: interest,
                fee: Decimal::ZERO,
                balance: credited.balance,
            };
            Ok((credited, vec![event]))
        })
    }

    /// Load an account or fail with AccountNotFound
    fn load(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.accounts
            .get(id)?
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Reject non-positive amounts and amounts with sub-cent digits
    ///
    /// Returns the amount at the currency scale, so `100.000` is applied as
    /// `100.00`.
    fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
        if policy::is_valid_amount(amount) {
            Ok(policy::to_currency_scale(amount))
        } else {
            Err(LedgerError::invalid_amount(amount))
        }
    }

    /// Compute the account after debiting `amount` plus the transaction fee
    ///
    /// The funds check uses the fee at full precision; the resulting balance
    /// is rounded to the currency scale. It never goes below zero, since
    /// rounding a non-negative value half-up keeps it non-negative.
    fn debit_with_fee(
        account: &Account,
        amount: Decimal,
        operation: &str,
    ) -> Result<Account, LedgerError> {
        let overflow = || LedgerError::arithmetic_overflow(operation, account.id);

        let fee = policy::transaction_fee(amount).ok_or_else(overflow)?;
        let requested = amount.checked_add(fee).ok_or_else(overflow)?;
        if account.balance < requested {
            return Err(LedgerError::insufficient_funds(
                account.id,
                account.balance,
                requested,
            ));
        }

        let remaining = account.balance.checked_sub(requested).ok_or_else(overflow)?;
        let mut debited = account.clone();
        debited.balance = policy::to_currency_scale(remaining);
        Ok(debited)
    }

    /// Run one mutating operation under the locks of `accounts`
    ///
    /// The outcome is logged and its events published before the locks are
    /// released.
    fn exclusive(
        &self,
        operation: &str,
        accounts: &[AccountId],
        f: impl FnOnce() -> Result<Outcome, LedgerError>,
    ) -> Result<Account, LedgerError> {
        self.locks
            .with_exclusive(accounts, || self.finish(operation, f()))
    }

    /// Publish the events of a committed operation and log the outcome
    fn finish(
        &self,
        operation: &str,
        outcome: Result<Outcome, LedgerError>,
    ) -> Result<Account, LedgerError> {
        match outcome {
            Ok((account, events)) => {
                info!(
                    operation,
                    account = account.id,
                    balance = %account.balance,
                    "operation committed"
                );
                for event in events {
                    self.events.publish(event);
                }
                Ok(account)
            }
            Err(e) => {
                debug!(operation, error = %e, "operation rejected");
                Err(e)
            }
        }
    }
}
