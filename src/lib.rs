//! Resumable conversation stream synchronization engine.
//!
//! `session_relay` keeps a live, gap-free view of one coding-agent session:
//! the transport crate feeds decoded message batches in arrival order, the
//! message store merges them idempotently by UUID, and every read-model
//! (tool-call pairing, task board, context accounting, background-task
//! notifications) is recomputed deterministically from the log after each
//! merge. Rendering, process control, push subscription, and auth live in
//! the surrounding application; this crate does not know about them.

pub mod config;
pub mod drafts;
pub mod session;

pub use config::RelayConfig;
pub use drafts::{DraftStore, MemoryDraftStore};
pub use session::{drive, load_subagents, SessionSync, SessionTicket, Snapshot};

pub use conversation_api::{StreamClient, StreamConfig, StreamError};
pub use derived_views::{
    ContextLedger, CorrelationIndex, TaskBoard, TaskItem, TaskNotification, TaskStatus,
};
pub use message_log::{ConversationMessage, MessageStore, StreamBatch, SubagentInfo};
