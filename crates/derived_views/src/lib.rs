//! Pure read-models derived from the conversation log.
//!
//! Every view in this crate is a deterministic fold over the message slice
//! held by `message_log::MessageStore` — no view keeps state a replay from
//! scratch would not reproduce. That is the property that makes reconnects
//! and overlapping offset replays safe: the transport may stutter, but the
//! derived state is always a function of the log alone.
//!
//! Malformed or partially-shaped input is skipped at the point of
//! derivation, never fatal to the rest of the fold.

mod context;
mod correlation;
mod notifications;
mod tasks;

pub use context::{ContextLedger, UsageSample, DEFAULT_CONTEXT_BUDGET};
pub use correlation::{CorrelationIndex, ToolOutcome};
pub use notifications::{reconcile_notifications, TaskNotification, TaskNotificationStatus};
pub use tasks::{TaskBoard, TaskItem, TaskStatus};
