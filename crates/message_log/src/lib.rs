//! Wire schema and message store for one agent conversation.
//!
//! This crate owns the decoded message shapes delivered by the conversation
//! stream endpoint and the deduplicated append-only log they are merged into.
//! It intentionally contains no transport code and no derived read-models;
//! everything downstream folds over [`MessageStore::messages`].

mod schema;
mod store;

pub use schema::{
    BlockContent, ContentBlock, ConversationMessage, MessageBody, MessageContent, MessageKind,
    StreamBatch, SubagentInfo, Usage,
};
pub use store::MessageStore;
