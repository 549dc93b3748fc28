use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Record kind on the conversation log line.
///
/// The server writes more kinds than the engine interprets (for example
/// `queue-operation` records); those are preserved under [`MessageKind::Other`]
/// with their raw fields kept in [`ConversationMessage::extra`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
    Summary,
    #[serde(other)]
    Other,
}

/// One decoded conversation log record.
///
/// Immutable once stored; corrections arrive as a fresh record carrying the
/// same `uuid`, never as an in-place edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Fields the engine does not interpret, kept for faithful round-tripping
    /// and for records whose payload lives outside `message` (queue-operation
    /// notifications carry their text in a top-level `content` field).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ConversationMessage {
    /// Parsed RFC3339 timestamp, `None` when absent or malformed.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<OffsetDateTime> {
        let raw = self.timestamp.as_deref()?;
        OffsetDateTime::parse(raw, &Rfc3339).ok()
    }

    /// Content blocks of the body, or an empty slice for plain-text bodies.
    #[must_use]
    pub fn content_blocks(&self) -> &[ContentBlock] {
        match self.message.as_ref().and_then(|body| body.content.as_ref()) {
            Some(MessageContent::Blocks(blocks)) => blocks,
            _ => &[],
        }
    }

    /// Plain text of the body when the content is a bare string.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        match self.message.as_ref().and_then(|body| body.content.as_ref()) {
            Some(MessageContent::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Raw top-level `content` string for records that carry their payload
    /// outside the message body (queue-operation notifications).
    #[must_use]
    pub fn raw_content(&self) -> Option<&str> {
        self.extra.get("content").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub role: Option<String>,
    pub content: Option<MessageContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Body content: either a bare string or structured blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// Tagged content block union.
///
/// Decoding is deliberately lenient: unknown block types and blocks missing
/// required fields become [`ContentBlock::Unknown`], which every fold
/// ignores. A single malformed block must never fail its whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Thinking {
        thinking: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<BlockContent>,
        is_error: bool,
    },
    Unknown,
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl ContentBlock {
    fn from_value(value: &Value) -> Self {
        let field_str = |key: &str| value.get(key).and_then(Value::as_str);

        match field_str("type") {
            Some("text") => match field_str("text") {
                Some(text) => Self::Text {
                    text: text.to_string(),
                },
                None => Self::Unknown,
            },
            Some("thinking") => match field_str("thinking") {
                Some(thinking) => Self::Thinking {
                    thinking: thinking.to_string(),
                },
                None => Self::Unknown,
            },
            Some("tool_use") => match (field_str("id"), field_str("name")) {
                (Some(id), Some(name)) => Self::ToolUse {
                    id: id.to_string(),
                    name: name.to_string(),
                    input: value.get("input").cloned().unwrap_or(Value::Null),
                },
                _ => Self::Unknown,
            },
            Some("tool_result") => match field_str("tool_use_id") {
                Some(tool_use_id) => Self::ToolResult {
                    tool_use_id: tool_use_id.to_string(),
                    content: value
                        .get("content")
                        .cloned()
                        .and_then(|content| serde_json::from_value(content).ok()),
                    is_error: value
                        .get("is_error")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                },
                None => Self::Unknown,
            },
            _ => Self::Unknown,
        }
    }
}

/// Tool-result content: either a bare string or nested blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl BlockContent {
    /// Flattened text view over string content and nested text blocks.
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Blocks(blocks) => {
                let mut out = String::new();
                for block in blocks {
                    if let ContentBlock::Text { text } = block {
                        if !out.is_empty() {
                            out.push('\n');
                        }
                        out.push_str(text);
                    }
                }
                out
            }
        }
    }
}

/// Token usage metadata attached to usage-bearing assistant turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_creation_input_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u64>,
}

/// Payload of one `messages` stream event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamBatch {
    pub messages: Vec<ConversationMessage>,
    /// Position the server should resume from on the next connection.
    pub offset: u64,
}

/// One subagent correlation row from the ancillary per-session fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubagentInfo {
    pub tool_use_id: String,
    pub agent_id: String,
}
