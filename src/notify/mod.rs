//! Balance-change events and customer notifications
//!
//! The ledger engine never talks to a notification channel directly. After
//! each commit it publishes a [`BalanceChanged`] event to an
//! [`EventSink`](crate::core::traits::EventSink); a separate
//! [`NotificationDispatcher`] consumes those events and delivers messages
//! through a [`Notifier`]. Delivery failures are logged and dropped, they
//! never reach the engine.
//!
//! ```text
//! LedgerEngine ── publish ──> ChannelSink ── mpsc ──> NotificationDispatcher ──> Notifier
//! ```

pub mod dispatcher;
pub mod event;
pub mod notifier;
pub mod sink;

pub use dispatcher::{DispatchSummary, NotificationDispatcher};
pub use event::{BalanceChange, BalanceChanged, Notification};
pub use notifier::{Notifier, NotifyError, TracingNotifier};
pub use sink::{ChannelSink, MemorySink};
