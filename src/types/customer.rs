//! Customer records referenced by accounts

use super::transaction::CustomerId;

/// A bank customer
///
/// Customers are owned by the customer directory; the ledger engine only
/// reads them (to validate account opening and to address notifications).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Contact address, unique across the directory
    pub email: String,
}
