//! Asynchronous delivery of notifications for published balance changes
//!
//! The dispatcher runs as a tokio task, draining the channel fed by a
//! [`ChannelSink`](super::ChannelSink) until every sender is dropped. Each
//! notification is delivered on the blocking pool under a timeout, so a slow
//! or failing [`Notifier`] only costs a log line.

use crate::core::traits::CustomerDirectory;
use crate::notify::{BalanceChanged, Notifier, NotifyError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default upper bound for a single delivery
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Counters reported when the dispatcher stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Notifications handed to the notifier successfully
    pub delivered: usize,
    /// Events with no customer-facing message, or whose customer is unknown
    pub skipped: usize,
    /// Deliveries that failed or timed out
    pub failed: usize,
}

/// Consumer of balance-change events that notifies the affected customers
#[derive(Clone)]
pub struct NotificationDispatcher {
    customers: Arc<dyn CustomerDirectory>,
    notifier: Arc<dyn Notifier>,
    delivery_timeout: Duration,
}

impl NotificationDispatcher {
    /// Create a dispatcher with the default delivery timeout
    pub fn new(customers: Arc<dyn CustomerDirectory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            customers,
            notifier,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    /// Override how long a single delivery may take
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Consume events until the channel closes
    ///
    /// # Returns
    ///
    /// Counters of delivered, skipped and failed notifications.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<BalanceChanged>) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        while let Some(event) = events.recv().await {
            match self.deliver(event).await {
                Ok(true) => summary.delivered += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    warn!(error = %e, "notification not delivered");
                    summary.failed += 1;
                }
            }
        }

        debug!(?summary, "notification dispatcher stopped");
        summary
    }

    /// Deliver the notification for one event
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The notifier accepted the message
    /// * `Ok(false)` - Nothing to deliver for this event
    /// * `Err(NotifyError)` - Delivery failed or timed out
    async fn deliver(&self, event: BalanceChanged) -> Result<bool, NotifyError> {
        let Some(notification) = event.notification() else {
            return Ok(false);
        };

        let Some(customer) = self.customers.get(event.customer) else {
            warn!(
                customer = event.customer,
                account = event.account,
                "no customer record for notification"
            );
            return Ok(false);
        };

        let notifier = Arc::clone(&self.notifier);
        let delivery = tokio::task::spawn_blocking(move || {
            notifier.notify(&customer, &notification.subject, &notification.body)
        });

        match tokio::time::timeout(self.delivery_timeout, delivery).await {
            Ok(Ok(result)) => result.map(|()| true),
            Ok(Err(join_error)) => Err(NotifyError::Delivery {
                recipient: event.customer.to_string(),
                reason: join_error.to_string(),
            }),
            Err(_) => Err(NotifyError::Timeout),
        }
    }
}
