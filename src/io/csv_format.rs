//! CSV format handling for ledger commands, account output and the journal
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger commands
//! - Account and transaction output serialization
//!
//! All functions are pure (no file handling) for easy testing.

use crate::types::{Account, AccountId, AccountType, LedgerCommand, Transaction};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns:
/// `op, customer, account, counterparty, amount, name, email`.
/// Every column but `op` is optional; which ones are required depends on the
/// operation.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    pub op: String,
    pub customer: Option<u64>,
    pub account: Option<AccountId>,
    pub counterparty: Option<AccountId>,
    pub amount: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Convert a CsvRecord to a LedgerCommand
///
/// This function:
/// - Parses the operation name (case insensitive)
/// - Parses the amount string into a Decimal (if present)
/// - Validates that the columns the operation needs are present
///
/// Amount sign and precision are not checked here; the engine rejects
/// invalid amounts itself.
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(LedgerCommand) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, String> {
    let op = csv_record.op.trim().to_lowercase();

    let amount = match csv_record.amount.as_deref().map(str::trim) {
        Some(amount_str) if !amount_str.is_empty() => match Decimal::from_str(amount_str) {
            Ok(decimal) => Some(decimal),
            Err(_) => return Err(format!("Invalid amount '{}' for {}", amount_str, op)),
        },
        _ => None,
    };

    let require = |value: Option<u64>, column: &str| {
        value.ok_or_else(|| format!("{} requires a '{}' column", op, column))
    };
    let require_amount =
        || amount.ok_or_else(|| format!("{} requires an amount", op));
    let require_text = |value: &Option<String>, column: &str| match value.as_deref().map(str::trim)
    {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(format!("{} requires a '{}' column", op, column)),
    };

    let command = match op.as_str() {
        "register" => LedgerCommand::Register {
            name: require_text(&csv_record.name, "name")?,
            email: require_text(&csv_record.email, "email")?,
        },
        "open_current" => LedgerCommand::Open {
            customer: require(csv_record.customer, "customer")?,
            account_type: AccountType::Current,
        },
        "open_savings" => LedgerCommand::Open {
            customer: require(csv_record.customer, "customer")?,
            account_type: AccountType::Savings,
        },
        "deposit" => LedgerCommand::Deposit {
            from: require(csv_record.account, "account")?,
            to: require(csv_record.counterparty, "counterparty")?,
            amount: require_amount()?,
        },
        "withdraw" => LedgerCommand::Withdraw {
            account: require(csv_record.account, "account")?,
            amount: require_amount()?,
        },
        "transfer" => LedgerCommand::Transfer {
            from: require(csv_record.account, "account")?,
            to: require(csv_record.counterparty, "counterparty")?,
            amount: require_amount()?,
        },
        "interest" => LedgerCommand::Interest {
            account: require(csv_record.account, "account")?,
        },
        _ => return Err(format!("Invalid operation: '{}'", csv_record.op)),
    };

    Ok(command)
}

/// Write account states to CSV format
///
/// Writes accounts in CSV format with columns: account, customer, type, balance.
/// Accounts are sorted by account ID for deterministic output and balances
/// are printed with two decimal places.
///
/// # Arguments
///
/// * `accounts` - Slice of account states to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["account", "customer", "type", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.customer.to_string(),
                account.account_type.to_string(),
                format!("{:.2}", account.balance),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write the transaction journal to CSV format
///
/// Columns: transaction, account, type, amount, fee, description, timestamp.
/// Records are written in the order given; timestamps use RFC 3339.
pub fn write_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "transaction",
            "account",
            "type",
            "amount",
            "fee",
            "description",
            "timestamp",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for tx in transactions {
        writer
            .write_record(&[
                tx.id.to_string(),
                tx.account.to_string(),
                tx.transaction_type.to_string(),
                format!("{:.2}", tx.amount),
                format!("{:.2}", tx.fee),
                tx.description.clone(),
                tx.timestamp.to_rfc3339(),
            ])
            .map_err(|e| format!("Failed to write transaction record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush journal: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn record(op: &str) -> CsvRecord {
        CsvRecord {
            op: op.to_string(),
            ..CsvRecord::default()
        }
    }

    #[test]
    fn test_convert_register() {
        let csv_record = CsvRecord {
            name: Some("Jane Doe".to_string()),
            email: Some(" jane@example.com ".to_string()),
            ..record("register")
        };

        assert_eq!(
            convert_csv_record(csv_record),
            Ok(LedgerCommand::Register {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
            })
        );
    }

    #[rstest]
    #[case("open_current", AccountType::Current)]
    #[case("OPEN_SAVINGS", AccountType::Savings)] // case insensitive
    fn test_convert_open(#[case] op: &str, #[case] expected: AccountType) {
        let csv_record = CsvRecord {
            customer: Some(3),
            ..record(op)
        };

        assert_eq!(
            convert_csv_record(csv_record),
            Ok(LedgerCommand::Open {
                customer: 3,
                account_type: expected,
            })
        );
    }

    #[rstest]
    #[case::deposit("deposit", LedgerCommand::Deposit { from: 1, to: 2, amount: Decimal::new(10050, 2) })]
    #[case::transfer("transfer", LedgerCommand::Transfer { from: 1, to: 2, amount: Decimal::new(10050, 2) })]
    #[case::withdraw("withdraw", LedgerCommand::Withdraw { account: 1, amount: Decimal::new(10050, 2) })]
    #[case::interest("interest", LedgerCommand::Interest { account: 1 })]
    fn test_convert_money_commands(#[case] op: &str, #[case] expected: LedgerCommand) {
        let csv_record = CsvRecord {
            account: Some(1),
            counterparty: Some(2),
            amount: Some("  100.50 ".to_string()),
            ..record(op)
        };

        assert_eq!(convert_csv_record(csv_record), Ok(expected));
    }

    #[rstest]
    #[case::invalid_op(record("close"), "Invalid operation")]
    #[case::register_missing_email(CsvRecord { name: Some("Jane".to_string()), ..record("register") }, "requires a 'email' column")]
    #[case::open_missing_customer(record("open_current"), "requires a 'customer' column")]
    #[case::deposit_missing_counterparty(CsvRecord { account: Some(1), amount: Some("1".to_string()), ..record("deposit") }, "requires a 'counterparty' column")]
    #[case::withdraw_missing_amount(CsvRecord { account: Some(1), ..record("withdraw") }, "requires an amount")]
    #[case::whitespace_amount(CsvRecord { account: Some(1), amount: Some("  ".to_string()), ..record("withdraw") }, "requires an amount")]
    #[case::invalid_amount(CsvRecord { account: Some(1), amount: Some("ten".to_string()), ..record("withdraw") }, "Invalid amount")]
    fn test_convert_csv_record_errors(#[case] csv_record: CsvRecord, #[case] expected_error: &str) {
        let result = convert_csv_record(csv_record);

        assert!(result.unwrap_err().contains(expected_error));
    }

    #[rstest]
    #[case::sorted_by_account_id(
        vec![
            Account { id: 2, customer: 1, account_type: AccountType::Savings, balance: Decimal::new(500, 0) },
            Account { id: 1, customer: 1, account_type: AccountType::Current, balance: Decimal::new(9995, 2) },
        ],
        "account,customer,type,balance\n1,1,current,99.95\n2,1,savings,500.00\n"
    )]
    #[case::empty_accounts(vec![], "account,customer,type,balance\n")]
    fn test_write_accounts_csv(#[case] accounts: Vec<Account>, #[case] expected_output: &str) {
        let mut output = Vec::new();
        write_accounts_csv(&accounts, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), expected_output);
    }

    #[test]
    fn test_write_transactions_csv() {
        let transactions = vec![Transaction {
            id: 1,
            account: 4,
            amount: Decimal::new(-10005, 2),
            fee: Decimal::new(5, 2),
            transaction_type: TransactionType::Withdrawal,
            description: "Withdrawal".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }];

        let mut output = Vec::new();
        write_transactions_csv(&transactions, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "transaction,account,type,amount,fee,description,timestamp\n\
             1,4,withdrawal,-100.05,0.05,Withdrawal,2024-05-01T12:00:00+00:00\n"
        );
    }
}
