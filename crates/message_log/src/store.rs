use std::collections::HashMap;

use crate::schema::ConversationMessage;

/// Append-only, deduplicated, order-preserving log for one active session.
///
/// Merging is keyed by message UUID and idempotent, so overlapping replays
/// from a slightly-stale stream offset can only re-affirm existing entries or
/// append genuinely new ones — never reorder the log. Messages without a UUID
/// are always appended.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<ConversationMessage>,
    index_by_uuid: HashMap<String, usize>,
    offset: u64,
}

impl MessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one decoded batch and returns the full ordered log.
    ///
    /// A message whose UUID is already present replaces the stored entry in
    /// place, keeping its position; a new UUID appends; an absent UUID always
    /// appends.
    pub fn merge(&mut self, batch: Vec<ConversationMessage>) -> &[ConversationMessage] {
        for message in batch {
            let uuid = message.uuid.clone().filter(|uuid| !uuid.is_empty());
            match uuid {
                Some(uuid) => {
                    if let Some(&position) = self.index_by_uuid.get(&uuid) {
                        self.messages[position] = message;
                    } else {
                        self.index_by_uuid.insert(uuid, self.messages.len());
                        self.messages.push(message);
                    }
                }
                None => self.messages.push(message),
            }
        }

        &self.messages
    }

    /// Advances the held resume offset; never moves backward.
    pub fn advance_offset(&mut self, offset: u64) {
        self.offset = self.offset.max(offset);
    }

    /// Position the next stream connection should resume from.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clears the log and offset for a session switch.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.index_by_uuid.clear();
        self.offset = 0;
    }
}
