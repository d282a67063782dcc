//! Event sinks the ledger engine publishes to

use crate::core::traits::EventSink;
use crate::notify::BalanceChanged;
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::warn;

/// Sink forwarding events to a [`NotificationDispatcher`](super::NotificationDispatcher)
///
/// Uses an unbounded channel so publishing never blocks inside the engine,
/// and works from plain threads as well as from async tasks.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<BalanceChanged>,
}

impl ChannelSink {
    /// Create a sink and the receiving half to hand to the dispatcher
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BalanceChanged>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: BalanceChanged) {
        if let Err(mpsc::error::SendError(event)) = self.sender.send(event) {
            warn!(account = event.account, "event dropped: dispatcher has stopped");
        }
    }
}

/// Sink that keeps every event in memory
///
/// Handy when the caller wants to inspect what the engine emitted.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<BalanceChanged>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events published so far, in publish order
    pub fn events(&self) -> Vec<BalanceChanged> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for MemorySink {
    fn publish(&self, event: BalanceChanged) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
