use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use message_log::{BlockContent, ContentBlock, ConversationMessage, SubagentInfo};

fn background_task_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"Command running in background with ID:\s*`?([A-Za-z0-9_-]+)`?")
            .expect("background task regex must compile")
    })
}

/// Outcome of one tool invocation, keyed by its tool_use id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub content: String,
    pub is_error: bool,
}

/// Correlation maps folded from the log in a single pass.
///
/// The subagent map is not derivable from the log; it arrives from the
/// ancillary per-session fetch and is only held here so every id lookup
/// lives behind one type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationIndex {
    tool_names: HashMap<String, String>,
    tool_results: HashMap<String, ToolOutcome>,
    background_tasks: HashMap<String, String>,
    subagents: HashMap<String, String>,
}

impl CorrelationIndex {
    /// Folds the current log snapshot into fresh correlation maps.
    ///
    /// Later entries win on duplicate tool_use ids, matching log order.
    #[must_use]
    pub fn build(log: &[ConversationMessage]) -> Self {
        let mut index = Self::default();

        for message in log {
            for block in message.content_blocks() {
                match block {
                    ContentBlock::ToolUse { id, name, .. } => {
                        index.tool_names.insert(id.clone(), name.clone());
                    }
                    ContentBlock::ToolResult {
                        tool_use_id,
                        content,
                        is_error,
                    } => {
                        let text = content.as_ref().map(BlockContent::plain_text).unwrap_or_default();
                        if let Some(captures) = background_task_regex().captures(&text) {
                            if let Some(task_id) = captures.get(1) {
                                index
                                    .background_tasks
                                    .insert(task_id.as_str().to_string(), tool_use_id.clone());
                            }
                        }
                        index.tool_results.insert(
                            tool_use_id.clone(),
                            ToolOutcome {
                                content: text,
                                is_error: *is_error,
                            },
                        );
                    }
                    _ => {}
                }
            }
        }

        index
    }

    /// Installs the externally fetched subagent rows, first agent id wins.
    pub fn set_subagents(&mut self, infos: &[SubagentInfo]) {
        self.subagents.clear();
        let mut seen_agents = HashSet::new();
        for info in infos {
            if seen_agents.insert(info.agent_id.clone()) {
                self.subagents
                    .insert(info.tool_use_id.clone(), info.agent_id.clone());
            }
        }
    }

    #[must_use]
    pub fn tool_name(&self, tool_use_id: &str) -> Option<&str> {
        self.tool_names.get(tool_use_id).map(String::as_str)
    }

    #[must_use]
    pub fn tool_result(&self, tool_use_id: &str) -> Option<&ToolOutcome> {
        self.tool_results.get(tool_use_id)
    }

    /// Maps a background task id to the tool_use that launched it.
    #[must_use]
    pub fn background_tool_use(&self, task_id: &str) -> Option<&str> {
        self.background_tasks.get(task_id).map(String::as_str)
    }

    /// Maps a subagent-launching tool_use id to its agent id.
    #[must_use]
    pub fn subagent_id(&self, tool_use_id: &str) -> Option<&str> {
        self.subagents.get(tool_use_id).map(String::as_str)
    }

    #[must_use]
    pub fn pending_tool_uses(&self) -> Vec<&str> {
        self.tool_names
            .keys()
            .filter(|id| !self.tool_results.contains_key(*id))
            .map(String::as_str)
            .collect()
    }
}
