#![allow(dead_code)]

use message_log::ConversationMessage;
use serde_json::{json, Value};

pub fn decode(value: Value) -> ConversationMessage {
    serde_json::from_value(value).expect("fixture message should decode")
}

pub fn user_text(uuid: &str, text: &str) -> ConversationMessage {
    decode(json!({
        "type": "user",
        "uuid": uuid,
        "message": { "role": "user", "content": text },
    }))
}

pub fn assistant_blocks(uuid: &str, blocks: Value) -> ConversationMessage {
    decode(json!({
        "type": "assistant",
        "uuid": uuid,
        "message": { "role": "assistant", "content": blocks },
    }))
}

pub fn tool_use(id: &str, name: &str, input: Value) -> Value {
    json!({ "type": "tool_use", "id": id, "name": name, "input": input })
}

pub fn tool_result(tool_use_id: &str, content: &str, is_error: bool) -> Value {
    json!({
        "type": "tool_result",
        "tool_use_id": tool_use_id,
        "content": content,
        "is_error": is_error,
    })
}

pub fn user_tool_results(uuid: &str, blocks: Value) -> ConversationMessage {
    decode(json!({
        "type": "user",
        "uuid": uuid,
        "message": { "role": "user", "content": blocks },
    }))
}
