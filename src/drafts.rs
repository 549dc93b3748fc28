//! Per-session input draft persistence.
//!
//! Drafts are keyed by session id behind an explicit interface injected into
//! the consumer — never ambient global state. Implementations that persist
//! drafts load their backing data once at construction.

use std::collections::HashMap;

/// Key-value interface for per-session input drafts.
pub trait DraftStore {
    fn get(&self, session_id: &str) -> Option<&str>;
    fn set(&mut self, session_id: &str, text: String);
    fn clear(&mut self, session_id: &str);
}

/// In-memory draft store.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    entries: HashMap<String, String>,
}

impl MemoryDraftStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with previously persisted drafts, once, up front.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DraftStore for MemoryDraftStore {
    fn get(&self, session_id: &str) -> Option<&str> {
        self.entries.get(session_id).map(String::as_str)
    }

    fn set(&mut self, session_id: &str, text: String) {
        self.entries.insert(session_id.to_string(), text);
    }

    fn clear(&mut self, session_id: &str) {
        self.entries.remove(session_id);
    }
}
