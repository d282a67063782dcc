//! In-memory customer directory
//!
//! Customers are registered once and never modified. Email addresses are
//! unique across the directory.

use crate::core::traits::CustomerDirectory;
use crate::types::{Customer, CustomerId, LedgerError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// In-memory customer records keyed by ID
#[derive(Debug)]
pub struct InMemoryCustomerDirectory {
    customers: DashMap<CustomerId, Customer>,

    /// Lowercased email to owning customer
    emails: DashMap<String, CustomerId>,
    next_id: AtomicU64,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self {
            customers: DashMap::new(),
            emails: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new customer
    ///
    /// The email entry stays locked until the customer is stored, so two
    /// registrations with the same address cannot both succeed.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name of the customer
    /// * `email` - Contact address, compared case-insensitively
    ///
    /// # Returns
    ///
    /// * `Ok(Customer)` - The new customer with an assigned ID (1, 2, 3, ...)
    /// * `Err(LedgerError::CustomerAlreadyExists)` - If the email is taken
    pub fn register(&self, name: &str, email: &str) -> Result<Customer, LedgerError> {
        let slot = match self.emails.entry(email.trim().to_lowercase()) {
            Entry::Occupied(_) => return Err(LedgerError::customer_already_exists(email)),
            Entry::Vacant(slot) => slot,
        };

        let customer = Customer {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            email: email.trim().to_string(),
        };
        self.customers.insert(customer.id, customer.clone());
        slot.insert(customer.id);

        info!(customer = customer.id, "customer registered");
        Ok(customer)
    }
}

impl Default for InMemoryCustomerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerDirectory for InMemoryCustomerDirectory {
    fn get(&self, id: CustomerId) -> Option<Customer> {
        self.customers.get(&id).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_register_assigns_ids_and_stores_customer() {
        let directory = InMemoryCustomerDirectory::new();

        let jane = directory.register("Jane Doe", "jane@example.com").unwrap();
        let john = directory.register("John Doe", "john@example.com").unwrap();

        assert_eq!(jane.id, 1);
        assert_eq!(john.id, 2);
        assert_eq!(directory.get(1), Some(jane));
        assert_eq!(directory.get(3), None);
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let directory = InMemoryCustomerDirectory::new();
        directory.register("Jane Doe", "jane@example.com").unwrap();

        let result = directory.register("Jane Again", " JANE@example.com ");

        assert_eq!(
            result,
            Err(LedgerError::customer_already_exists(" JANE@example.com "))
        );
    }
    #[test]
    fn test_concurrent_registrations_get_unique_ids() {
        let directory = Arc::new(InMemoryCustomerDirectory::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let directory = Arc::clone(&directory);
                thread::spawn(move || {
                    (0..50)
                        .map(|i| {
                            directory
                                .register("Customer", &format!("c{}-{}@example.com", t, i))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<CustomerId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();

        assert_eq!(ids, (1..=400).collect::<Vec<_>>());
    }

    #[test]
    fn test_racing_registrations_of_one_email_admit_one() {
        let directory = Arc::new(InMemoryCustomerDirectory::new());
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let directory = Arc::clone(&directory);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    directory.register("Jane", "jane@example.com")
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().all(|r| match r {
            Ok(customer) => customer.id == 1,
            Err(e) => matches!(e, LedgerError::CustomerAlreadyExists { .. }),
        }));
        assert!(directory.get(2).is_none());
    }
}
