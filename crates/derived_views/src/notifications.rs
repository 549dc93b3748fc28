use std::collections::HashSet;

use message_log::{ConversationMessage, MessageKind};

use crate::correlation::CorrelationIndex;

/// Reported background-task state, kept open-ended for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskNotificationStatus {
    Running,
    Completed,
    Failed,
    Other(String),
}

impl TaskNotificationStatus {
    fn parse(value: &str) -> Self {
        match value {
            "running" => Self::Running,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Canonical notification for one background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNotification {
    pub task_id: String,
    pub status: TaskNotificationStatus,
    pub summary: String,
    /// Tool_use that launched the task, when the correlation map knows it.
    pub tool_use_id: Option<String>,
}

/// Collapses duplicate background-task notifications to one per task id.
///
/// A completion can surface twice: embedded as `<task-notification>` markup
/// in a user-role message and again in a queue-operation record carrying the
/// same markup. The log is walked backward and only the first occurrence per
/// task id is kept — i.e. the last one in forward order wins. Kept entries
/// are returned in forward log order.
#[must_use]
pub fn reconcile_notifications(
    log: &[ConversationMessage],
    correlation: &CorrelationIndex,
) -> Vec<TaskNotification> {
    let mut seen_task_ids = HashSet::new();
    let mut kept = Vec::new();

    for message in log.iter().rev() {
        let Some(text) = notification_text(message) else {
            continue;
        };
        let Some(mut notification) = parse_embedded_notification(text) else {
            continue;
        };
        if !seen_task_ids.insert(notification.task_id.clone()) {
            continue;
        }

        notification.tool_use_id = correlation
            .background_tool_use(&notification.task_id)
            .map(ToString::to_string);
        kept.push(notification);
    }

    kept.reverse();
    kept
}

/// Text that may embed a task notification: user body text, or the raw
/// top-level content of an uninterpreted record kind (queue-operation).
fn notification_text(message: &ConversationMessage) -> Option<&str> {
    match message.kind {
        MessageKind::User => message.body_text(),
        MessageKind::Other => message.raw_content(),
        _ => None,
    }
}

fn parse_embedded_notification(text: &str) -> Option<TaskNotification> {
    if !text.contains("<task-notification>") {
        return None;
    }

    let task_id = extract_tag(text, "task-id")?;
    let status = extract_tag(text, "status").unwrap_or_default();
    let summary = extract_tag(text, "summary").unwrap_or_default();

    Some(TaskNotification {
        task_id,
        status: TaskNotificationStatus::parse(&status),
        summary,
        tool_use_id: None,
    })
}

fn extract_tag(text: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;
    Some(text[start..end].trim().to_string())
}
