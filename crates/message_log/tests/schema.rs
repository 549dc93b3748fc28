use message_log::{BlockContent, ContentBlock, ConversationMessage, MessageKind, StreamBatch};

#[test]
fn decodes_assistant_message_with_tool_use_and_usage() {
    let line = r#"{
        "type": "assistant",
        "uuid": "m1",
        "timestamp": "2026-08-26T10:15:00Z",
        "message": {
            "role": "assistant",
            "model": "some-model",
            "usage": {
                "input_tokens": 20,
                "output_tokens": 9,
                "cache_read_input_tokens": 80
            },
            "content": [
                {"type": "text", "text": "Running the build."},
                {"type": "tool_use", "id": "tu1", "name": "Bash", "input": {"command": "make"}}
            ]
        }
    }"#;

    let message: ConversationMessage = serde_json::from_str(line).expect("line should decode");
    assert_eq!(message.kind, MessageKind::Assistant);
    assert!(message.parsed_timestamp().is_some());

    let blocks = message.content_blocks();
    assert_eq!(blocks.len(), 2);
    assert!(matches!(
        &blocks[1],
        ContentBlock::ToolUse { id, name, .. } if id == "tu1" && name == "Bash"
    ));

    let usage = message
        .message
        .as_ref()
        .and_then(|body| body.usage)
        .expect("usage should be present");
    assert_eq!(usage.input_tokens, Some(20));
    assert_eq!(usage.cache_read_input_tokens, Some(80));
    assert_eq!(usage.cache_creation_input_tokens, None);
}

#[test]
fn decodes_tool_result_with_nested_blocks() {
    let line = r#"{
        "type": "user",
        "uuid": "m2",
        "message": {
            "role": "user",
            "content": [
                {
                    "type": "tool_result",
                    "tool_use_id": "tu1",
                    "is_error": false,
                    "content": [
                        {"type": "text", "text": "build ok"},
                        {"type": "text", "text": "0 warnings"}
                    ]
                }
            ]
        }
    }"#;

    let message: ConversationMessage = serde_json::from_str(line).expect("line should decode");
    let blocks = message.content_blocks();
    let ContentBlock::ToolResult {
        tool_use_id,
        content,
        is_error,
    } = &blocks[0]
    else {
        panic!("first block should be a tool result");
    };

    assert_eq!(tool_use_id, "tu1");
    assert!(!is_error);
    let text = content.as_ref().map(BlockContent::plain_text);
    assert_eq!(text.as_deref(), Some("build ok\n0 warnings"));
}

#[test]
fn unknown_block_types_decode_as_ignored() {
    let line = r#"{
        "type": "assistant",
        "message": {
            "role": "assistant",
            "content": [
                {"type": "server_tool_use", "id": "x", "name": "web_search"},
                {"type": "text", "text": "still usable"}
            ]
        }
    }"#;

    let message: ConversationMessage = serde_json::from_str(line).expect("line should decode");
    let blocks = message.content_blocks();
    assert!(matches!(blocks[0], ContentBlock::Unknown));
    assert!(matches!(&blocks[1], ContentBlock::Text { text } if text == "still usable"));
}

#[test]
fn blocks_missing_required_fields_decode_as_ignored() {
    let line = r#"{
        "type": "assistant",
        "message": {
            "role": "assistant",
            "content": [
                {"type": "tool_use", "name": "Bash"},
                {"type": "tool_result"},
                {"type": "text"}
            ]
        }
    }"#;

    let message: ConversationMessage = serde_json::from_str(line).expect("line should decode");
    assert!(message
        .content_blocks()
        .iter()
        .all(|block| matches!(block, ContentBlock::Unknown)));
}

#[test]
fn unknown_record_kinds_keep_raw_fields() {
    let line = r#"{
        "type": "queue-operation",
        "uuid": "q1",
        "content": "<task-notification><task-id>42</task-id></task-notification>"
    }"#;

    let message: ConversationMessage = serde_json::from_str(line).expect("line should decode");
    assert_eq!(message.kind, MessageKind::Other);
    assert_eq!(
        message.raw_content(),
        Some("<task-notification><task-id>42</task-id></task-notification>")
    );
}

#[test]
fn summary_records_decode_without_body() {
    let line = r#"{"type": "summary", "summary": "Compacted earlier work"}"#;
    let message: ConversationMessage = serde_json::from_str(line).expect("line should decode");
    assert_eq!(message.kind, MessageKind::Summary);
    assert_eq!(message.summary.as_deref(), Some("Compacted earlier work"));
    assert!(message.content_blocks().is_empty());
}

#[test]
fn malformed_timestamp_reads_as_none() {
    let line = r#"{"type": "user", "timestamp": "not-a-time"}"#;
    let message: ConversationMessage = serde_json::from_str(line).expect("line should decode");
    assert!(message.parsed_timestamp().is_none());
}

#[test]
fn stream_batch_payload_decodes() {
    let payload = r#"{
        "messages": [{"type": "user", "uuid": "a", "message": {"role": "user", "content": "hi"}}],
        "offset": 57
    }"#;

    let batch: StreamBatch = serde_json::from_str(payload).expect("payload should decode");
    assert_eq!(batch.offset, 57);
    assert_eq!(batch.messages.len(), 1);
    assert_eq!(batch.messages[0].body_text(), Some("hi"));
}
