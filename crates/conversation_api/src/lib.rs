//! Transport-only streaming client for the conversation endpoints.
//!
//! This crate owns connect/resume/reconnect behavior for one session's
//! message stream: URL building with the held offset, incremental SSE frame
//! parsing, and the capped exponential backoff loop that keeps a long-lived
//! session fed across transient failures. It performs no merging — decoded
//! batches are handed to the caller exactly as received, in arrival order.

pub mod client;
pub mod config;
pub mod error;
pub mod reconnect;
pub mod sse;
pub mod url;

pub use client::{CancellationSignal, StreamClient};
pub use config::StreamConfig;
pub use error::StreamError;
pub use sse::{SseFrameParser, StreamEvent};
pub use url::{normalize_base_url, stream_url, subagents_url};
