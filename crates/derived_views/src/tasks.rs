use serde_json::Value;

use message_log::{ContentBlock, ConversationMessage, MessageKind};

const TASK_CREATE_TOOL: &str = "TaskCreate";
const TASK_UPDATE_TOOL: &str = "TaskUpdate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "pending" => Self::Pending,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => return None,
        })
    }
}

/// One logical task reconstructed from the log.
///
/// `id` is a local sequential identifier assigned in creation order, 1-based,
/// independent of anything the tool input carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub subject: String,
    pub status: TaskStatus,
    pub active_form: Option<String>,
}

/// Ordered task set folded from assistant-authored tool invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    tasks: Vec<TaskItem>,
    next_id: u64,
}

impl TaskBoard {
    /// Applies every `TaskCreate`/`TaskUpdate` invocation strictly in log
    /// order. Updates naming an unknown task id are no-ops: the log may have
    /// been replayed from a point after the corresponding create.
    #[must_use]
    pub fn build(log: &[ConversationMessage]) -> Self {
        let mut board = Self {
            tasks: Vec::new(),
            next_id: 1,
        };

        for message in log {
            if message.kind != MessageKind::Assistant {
                continue;
            }
            for block in message.content_blocks() {
                let ContentBlock::ToolUse { name, input, .. } = block else {
                    continue;
                };
                match name.as_str() {
                    TASK_CREATE_TOOL => board.apply_create(input),
                    TASK_UPDATE_TOOL => board.apply_update(input),
                    _ => {}
                }
            }
        }

        board
    }

    fn apply_create(&mut self, input: &Value) {
        let Some(subject) = input.get("subject").and_then(Value::as_str) else {
            tracing::debug!("skipping TaskCreate without a subject");
            return;
        };

        let id = self.next_id.to_string();
        self.next_id += 1;
        self.tasks.push(TaskItem {
            id,
            subject: subject.to_string(),
            status: TaskStatus::Pending,
            active_form: input
                .get("activeForm")
                .and_then(Value::as_str)
                .map(ToString::to_string),
        });
    }

    fn apply_update(&mut self, input: &Value) {
        let Some(task_id) = task_id_field(input) else {
            tracing::debug!("skipping TaskUpdate without a taskId");
            return;
        };
        let Some(position) = self.tasks.iter().position(|task| task.id == task_id) else {
            tracing::debug!(%task_id, "ignoring update for unknown task");
            return;
        };

        let status = input.get("status").and_then(Value::as_str);
        if status == Some("deleted") {
            self.tasks.remove(position);
            return;
        }

        let task = &mut self.tasks[position];
        if let Some(status) = status.and_then(TaskStatus::parse) {
            task.status = status;
        }
        if let Some(subject) = input.get("subject").and_then(Value::as_str) {
            task.subject = subject.to_string();
        }
    }

    /// Tasks in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    /// Human-readable label for a task id.
    #[must_use]
    pub fn subject_for(&self, task_id: &str) -> Option<&str> {
        self.tasks
            .iter()
            .find(|task| task.id == task_id)
            .map(|task| task.subject.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Accepts both string and numeric task id payloads.
fn task_id_field(input: &Value) -> Option<String> {
    match input.get("taskId")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
