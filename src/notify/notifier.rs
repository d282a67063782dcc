//! Outbound notification delivery

use crate::types::Customer;
use thiserror::Error;
use tracing::info;

/// Failure to deliver a notification
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotifyError {
    #[error("delivery to {recipient} failed: {reason}")]
    Delivery { recipient: String, reason: String },

    #[error("delivery timed out")]
    Timeout,
}

/// One-way, best-effort message delivery to a customer
pub trait Notifier: Send + Sync {
    fn notify(&self, customer: &Customer, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notifier that writes each message to the log instead of sending it
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, customer: &Customer, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(
            customer = customer.id,
            to = %customer.email,
            subject,
            body,
            "notification"
        );
        Ok(())
    }
}
