mod support;

use derived_views::CorrelationIndex;
use message_log::SubagentInfo;
use serde_json::json;
use support::{assistant_blocks, tool_result, tool_use, user_tool_results};

#[test]
fn tool_uses_map_ids_to_names() {
    let log = vec![assistant_blocks(
        "a1",
        json!([
            tool_use("tu1", "Bash", json!({"command": "ls"})),
            tool_use("tu2", "Read", json!({"file_path": "/tmp/x"})),
        ]),
    )];

    let index = CorrelationIndex::build(&log);
    assert_eq!(index.tool_name("tu1"), Some("Bash"));
    assert_eq!(index.tool_name("tu2"), Some("Read"));
    assert_eq!(index.tool_name("tu3"), None);
}

#[test]
fn tool_results_pair_with_their_tool_use() {
    let log = vec![
        assistant_blocks("a1", json!([tool_use("tu1", "Bash", json!({}))])),
        user_tool_results("u1", json!([tool_result("tu1", "exit 0", false)])),
    ];

    let index = CorrelationIndex::build(&log);
    let outcome = index.tool_result("tu1").expect("result should be paired");
    assert_eq!(outcome.content, "exit 0");
    assert!(!outcome.is_error);
    assert!(index.pending_tool_uses().is_empty());
}

#[test]
fn absent_result_means_still_pending() {
    let log = vec![assistant_blocks(
        "a1",
        json!([tool_use("tu1", "Bash", json!({}))]),
    )];

    let index = CorrelationIndex::build(&log);
    assert!(index.tool_result("tu1").is_none());
    assert_eq!(index.pending_tool_uses(), vec!["tu1"]);
}

#[test]
fn later_duplicate_result_wins_in_log_order() {
    let log = vec![
        user_tool_results("u1", json!([tool_result("tu1", "first", false)])),
        user_tool_results("u2", json!([tool_result("tu1", "second", true)])),
    ];

    let index = CorrelationIndex::build(&log);
    let outcome = index.tool_result("tu1").expect("result should exist");
    assert_eq!(outcome.content, "second");
    assert!(outcome.is_error);
}

#[test]
fn background_launches_correlate_task_id_to_tool_use() {
    let log = vec![user_tool_results(
        "u1",
        json!([tool_result(
            "tu9",
            "Command running in background with ID: bash_42",
            false
        )]),
    )];

    let index = CorrelationIndex::build(&log);
    assert_eq!(index.background_tool_use("bash_42"), Some("tu9"));
    assert_eq!(index.background_tool_use("bash_7"), None);
}

#[test]
fn background_pattern_tolerates_backticks() {
    let log = vec![user_tool_results(
        "u1",
        json!([tool_result(
            "tu9",
            "Command running in background with ID: `bash_42`",
            false
        )]),
    )];

    let index = CorrelationIndex::build(&log);
    assert_eq!(index.background_tool_use("bash_42"), Some("tu9"));
}

#[test]
fn nested_result_blocks_contribute_their_text() {
    let log = vec![user_tool_results(
        "u1",
        json!([{
            "type": "tool_result",
            "tool_use_id": "tu9",
            "content": [
                {"type": "text", "text": "Command running in background with ID: bash_7"}
            ],
            "is_error": false,
        }]),
    )];

    let index = CorrelationIndex::build(&log);
    assert_eq!(index.background_tool_use("bash_7"), Some("tu9"));
}

#[test]
fn malformed_blocks_are_skipped_not_fatal() {
    let log = vec![user_tool_results(
        "u1",
        json!([
            {"type": "tool_use", "name": "MissingId"},
            tool_result("tu1", "fine", false),
        ]),
    )];

    let index = CorrelationIndex::build(&log);
    assert!(index.tool_result("tu1").is_some());
}

#[test]
fn subagent_feed_is_held_with_first_agent_id_winning() {
    let mut index = CorrelationIndex::default();
    index.set_subagents(&[
        SubagentInfo {
            tool_use_id: "tu1".to_string(),
            agent_id: "agent-a".to_string(),
        },
        SubagentInfo {
            tool_use_id: "tu2".to_string(),
            agent_id: "agent-a".to_string(),
        },
        SubagentInfo {
            tool_use_id: "tu3".to_string(),
            agent_id: "agent-b".to_string(),
        },
    ]);

    assert_eq!(index.subagent_id("tu1"), Some("agent-a"));
    assert_eq!(index.subagent_id("tu2"), None);
    assert_eq!(index.subagent_id("tu3"), Some("agent-b"));
}
