//! Replay of ledger command scripts
//!
//! This module wires the in-memory collaborators, the ledger engine and the
//! notification dispatcher together and drives them from a stream of
//! commands.
//!
//! # Design
//!
//! `Replay` owns the in-memory stores and the engine and applies one
//! command at a time. `process` is the complete pipeline used by the binary:
//!
//! 1. Opens the command script with a `CommandReader`
//! 2. Starts a tokio runtime running the `NotificationDispatcher`
//! 3. Applies every command through the engine
//! 4. Writes the final accounts (and optionally the journal) as CSV
//! 5. Closes the event channel and waits for pending notifications
//!
//! Rejected and malformed commands are logged and skipped; only I/O and
//! runtime failures abort the replay.

use crate::core::{
    EventSink, InMemoryAccountStore, InMemoryCustomerDirectory, InMemoryTransactionLog,
    LedgerEngine,
};
use crate::io::{write_accounts_csv, write_transactions_csv, CommandReader};
use crate::notify::{ChannelSink, NotificationDispatcher, TracingNotifier};
use crate::types::{Account, LedgerCommand, LedgerError, Transaction};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters describing how a replay went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Commands the engine accepted
    pub applied: usize,
    /// Commands the engine refused with a `LedgerError`
    pub rejected: usize,
    /// Input rows that could not be turned into a command
    pub malformed: usize,
}

/// In-memory ledger driven by commands
pub struct Replay {
    customers: Arc<InMemoryCustomerDirectory>,
    accounts: Arc<InMemoryAccountStore>,
    log: Arc<InMemoryTransactionLog>,
    engine: LedgerEngine,
}

impl Replay {
    /// Create an empty ledger publishing balance events to `events`
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        let customers = Arc::new(InMemoryCustomerDirectory::new());
        let accounts = Arc::new(InMemoryAccountStore::new());
        let log = Arc::new(InMemoryTransactionLog::new());

        let engine = LedgerEngine::new(
            accounts.clone(),
            log.clone(),
            customers.clone(),
            events,
        );

        Self {
            customers,
            accounts,
            log,
            engine,
        }
    }

    /// Customer directory backing this ledger
    pub fn customers(&self) -> Arc<InMemoryCustomerDirectory> {
        Arc::clone(&self.customers)
    }

    /// The engine, for direct calls
    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }

    /// Apply one command
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the command was applied
    /// * `Err(LedgerError)` if the directory or the engine refused it
    pub fn apply(&self, command: LedgerCommand) -> Result<(), LedgerError> {
        match command {
            LedgerCommand::Register { name, email } => {
                self.customers.register(&name, &email)?;
            }
            LedgerCommand::Open {
                customer,
                account_type,
            } => {
                self.engine.open_account(customer, account_type)?;
            }
            LedgerCommand::Deposit { from, to, amount } => {
                self.engine.deposit(from, to, amount)?;
            }
            LedgerCommand::Withdraw { account, amount } => {
                self.engine.withdraw(account, amount)?;
            }
            LedgerCommand::Transfer { from, to, amount } => {
                self.engine.transfer(from, to, amount)?;
            }
            LedgerCommand::Interest { account } => {
                self.engine.apply_interest(account)?;
            }
        }
        Ok(())
    }

    /// Apply every command of a stream, skipping the ones that fail
    pub fn run<I>(&self, commands: I) -> ReplaySummary
    where
        I: IntoIterator<Item = Result<LedgerCommand, String>>,
    {
        let mut summary = ReplaySummary::default();

        for result in commands {
            match result {
                Ok(command) => {
                    let name = command.name();
                    match self.apply(command) {
                        Ok(()) => summary.applied += 1,
                        Err(e) => {
                            warn!(command = name, error = %e, "command rejected");
                            summary.rejected += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "malformed command");
                    summary.malformed += 1;
                }
            }
        }

        debug!(?summary, "replay finished");
        summary
    }

    /// Snapshot of every account, sorted by ID
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.get_all_accounts()
    }

    /// Snapshot of every transaction record, sorted by ID
    pub fn journal(&self) -> Vec<Transaction> {
        self.log.all()
    }
}

/// Replay a command script and write the resulting account states
///
/// # Arguments
///
/// * `input_path` - Path to the CSV command script
/// * `output` - Writer receiving the account CSV
/// * `journal` - Optional writer receiving the transaction journal CSV
/// * `delivery_timeout` - Upper bound for a single notification delivery
///
/// # Returns
///
/// * `Ok(ReplaySummary)` if the replay completed (individual commands may have been rejected)
/// * `Err(String)` if the input could not be read, the output could not be
///   written or the runtime failed
pub fn process(
    input_path: &Path,
    output: &mut dyn Write,
    journal: Option<&mut dyn Write>,
    delivery_timeout: Duration,
) -> Result<ReplaySummary, String> {
    let reader = CommandReader::open(input_path)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

    let (sink, receiver) = ChannelSink::new();
    let replay = Replay::new(Arc::new(sink));

    let dispatcher = NotificationDispatcher::new(replay.customers(), Arc::new(TracingNotifier))
        .with_delivery_timeout(delivery_timeout);
    let dispatch = runtime.spawn(dispatcher.run(receiver));

    let summary = replay.run(reader);

    write_accounts_csv(&replay.accounts(), output)?;
    if let Some(journal) = journal {
        write_transactions_csv(&replay.journal(), journal)?;
    }

    // Dropping the engine drops the last sender, which lets the dispatcher
    // drain the channel and stop
    drop(replay);
    let notifications = runtime
        .block_on(dispatch)
        .map_err(|e| format!("Notification dispatcher failed: {}", e))?;

    info!(
        applied = summary.applied,
        rejected = summary.rejected,
        malformed = summary.malformed,
        notified = notifications.delivered,
        notification_failures = notifications.failed,
        "replay complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemorySink;
    use crate::types::AccountType;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "op,customer,account,counterparty,amount,name,email\n";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn replay() -> Replay {
        Replay::new(Arc::new(MemorySink::new()))
    }

    #[test]
    fn test_apply_register_and_open() {
        let replay = replay();

        replay
            .apply(LedgerCommand::Register {
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
            })
            .unwrap();
        replay
            .apply(LedgerCommand::Open {
                customer: 1,
                account_type: AccountType::Savings,
            })
            .unwrap();

        let accounts = replay.accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].customer, 1);
        assert_eq!(accounts[0].balance, Decimal::new(500, 0));
        assert!(replay.journal().is_empty());
    }

    #[test]
    fn test_apply_surfaces_engine_errors() {
        let replay = replay();

        let result = replay.apply(LedgerCommand::Open {
            customer: 9,
            account_type: AccountType::Current,
        });

        assert_eq!(result, Err(LedgerError::customer_not_found(9)));
    }

    #[test]
    fn test_run_counts_outcomes() {
        let replay = replay();

        let summary = replay.run(vec![
            Ok(LedgerCommand::Register {
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
            }),
            Ok(LedgerCommand::Open {
                customer: 1,
                account_type: AccountType::Current,
            }),
            Ok(LedgerCommand::Withdraw {
                account: 1,
                amount: Decimal::ONE,
            }),
            Err("Line 5: Invalid operation: 'close'".to_string()),
        ]);

        assert_eq!(
            summary,
            ReplaySummary {
                applied: 2,
                rejected: 1,
                malformed: 1,
            }
        );
    }

    #[test]
    fn test_process_writes_accounts_and_journal() {
        let file = create_temp_csv(&format!(
            "{}\
             register,,,,,Jane,jane@example.com\n\
             open_current,1,,,,,\n\
             open_savings,1,,,,,\n\
             deposit,,2,1,200,,\n\
             deposit,,2,1,200,,\n\
             withdraw,,1,,100,,\n\
             transfer,,1,2,50,,\n\
             interest,,2,,,,\n",
            HEADER
        ));

        let mut output = Vec::new();
        let mut journal = Vec::new();
        let summary = process(
            file.path(),
            &mut output,
            Some(&mut journal),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                applied: 7,
                rejected: 1,
                malformed: 0,
            }
        );
        // current: 200 - 100.05 - 50.025 -> 49.925 rounds half-up to 49.93
        // savings: 500 - 200 + 50 = 350, then 1.75 interest
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,customer,type,balance\n1,1,current,49.93\n2,1,savings,351.75\n"
        );

        let journal = String::from_utf8(journal).unwrap();
        let lines: Vec<&str> = journal.lines().collect();
        assert_eq!(
            lines[0],
            "transaction,account,type,amount,fee,description,timestamp"
        );
        // 2 deposit records, 1 withdrawal, 2 transfer records, 1 interest
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("1,2,withdrawal,-200.00,0.00,Deposit to Account ID: 1,"));
        assert!(lines[2].starts_with("2,1,deposit,200.00,0.00,Deposit from Account ID: 2,"));
        assert!(lines[3].starts_with("3,1,withdrawal,-100.05,0.05,Withdrawal,"));
        assert!(lines[6].starts_with("6,2,interest,1.75,0.00,Interest credited to Savings account,"));
    }

    #[test]
    fn test_process_fails_on_missing_input() {
        let mut output = Vec::new();

        let result = process(
            Path::new("nonexistent.csv"),
            &mut output,
            None,
            Duration::from_secs(1),
        );

        assert!(result.unwrap_err().contains("Failed to open file"));
        assert!(output.is_empty());
    }
}
