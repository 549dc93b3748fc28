use message_log::{ConversationMessage, MessageKind, Usage};

/// Fixed context budget used when no override is configured.
pub const DEFAULT_CONTEXT_BUDGET: u64 = 200_000;

/// Per-turn token accounting for one usage-bearing assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSample {
    pub turn_index: usize,
    /// Effective context size of the turn: raw input plus everything served
    /// from or written to the prompt cache.
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,
    /// Tokens neither read from nor written to the cache.
    pub fresh_tokens: u64,
    /// True for the first usage-bearing turn after a compaction summary.
    pub is_post_compaction: bool,
    pub timestamp: Option<String>,
}

/// Token usage and context utilization folded from the log.
///
/// Compaction resets the effective context but the log is never truncated; a
/// summary record simply flags the next usage-bearing turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextLedger {
    samples: Vec<UsageSample>,
    cumulative_input: u64,
    cumulative_output: u64,
    cumulative_cache_read: u64,
    compaction_count: usize,
    budget: u64,
}

impl ContextLedger {
    #[must_use]
    pub fn build(log: &[ConversationMessage], budget: u64) -> Self {
        let mut ledger = Self {
            samples: Vec::new(),
            cumulative_input: 0,
            cumulative_output: 0,
            cumulative_cache_read: 0,
            compaction_count: 0,
            budget: budget.max(1),
        };

        let mut pending_compaction = false;

        for message in log {
            if message.kind == MessageKind::Summary {
                ledger.compaction_count += 1;
                pending_compaction = true;
                continue;
            }
            if message.kind != MessageKind::Assistant {
                continue;
            }
            let Some(usage) = message.message.as_ref().and_then(|body| body.usage) else {
                continue;
            };

            let sample = sample_from_usage(
                ledger.samples.len(),
                &usage,
                pending_compaction,
                message.timestamp.clone(),
            );
            pending_compaction = false;

            ledger.cumulative_input += sample.input_tokens;
            ledger.cumulative_output += sample.output_tokens;
            ledger.cumulative_cache_read += sample.cache_read_tokens;
            ledger.samples.push(sample);
        }

        ledger
    }

    #[must_use]
    pub fn samples(&self) -> &[UsageSample] {
        &self.samples
    }

    /// Most recent turn's effective input, i.e. the current context size.
    #[must_use]
    pub fn current_input(&self) -> u64 {
        self.samples
            .last()
            .map(|sample| sample.input_tokens)
            .unwrap_or(0)
    }

    #[must_use]
    pub fn cumulative_input(&self) -> u64 {
        self.cumulative_input
    }

    #[must_use]
    pub fn cumulative_output(&self) -> u64 {
        self.cumulative_output
    }

    #[must_use]
    pub fn cumulative_cache_read(&self) -> u64 {
        self.cumulative_cache_read
    }

    #[must_use]
    pub fn compaction_count(&self) -> usize {
        self.compaction_count
    }

    #[must_use]
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Context utilization against the budget, in percent. Deliberately not
    /// clamped: values over 100 signal the session is over budget.
    #[must_use]
    pub fn utilization_percent(&self) -> f64 {
        self.current_input() as f64 / self.budget as f64 * 100.0
    }

    /// Share of cumulative input served from the prompt cache; 0 before any
    /// usage-bearing turn.
    #[must_use]
    pub fn cache_hit_rate(&self) -> f64 {
        if self.cumulative_input == 0 {
            return 0.0;
        }
        self.cumulative_cache_read as f64 / self.cumulative_input as f64
    }
}

fn sample_from_usage(
    turn_index: usize,
    usage: &Usage,
    is_post_compaction: bool,
    timestamp: Option<String>,
) -> UsageSample {
    let raw_input = usage.input_tokens.unwrap_or(0);
    let cache_read = usage.cache_read_input_tokens.unwrap_or(0);
    let cache_creation = usage.cache_creation_input_tokens.unwrap_or(0);
    let input_tokens = raw_input + cache_creation + cache_read;

    UsageSample {
        turn_index,
        input_tokens,
        output_tokens: usage.output_tokens.unwrap_or(0),
        cache_read_tokens: cache_read,
        cache_creation_tokens: cache_creation,
        fresh_tokens: input_tokens.saturating_sub(cache_read + cache_creation),
        is_post_compaction,
        timestamp,
    }
}
