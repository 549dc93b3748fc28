use std::future::Future;
use std::sync::{atomic::AtomicBool, atomic::Ordering, Arc};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use message_log::{StreamBatch, SubagentInfo};

use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::reconnect::reconnect_delay;
use crate::sse::{SseFrameParser, StreamEvent};
use crate::url::{stream_url, subagents_url};

/// Shared cancellation flag checked at every suspension point.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Resumable streaming client for one session server.
///
/// Owns "bytes in, batches out, reconnect on failure" and nothing else:
/// decoded batches are handed to the caller in arrival order, and the held
/// offset only ever moves forward.
#[derive(Debug)]
pub struct StreamClient {
    http: Client,
    headers: HeaderMap,
    config: StreamConfig,
}

impl StreamClient {
    /// Builds the client, validating configured headers up front so the
    /// stream loop itself has no configuration failure mode.
    pub fn new(config: StreamConfig) -> Result<Self, StreamError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &config.extra_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| StreamError::InvalidHeader { key: key.clone() })?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| StreamError::InvalidHeader { key: key.clone() })?;
            headers.insert(name, value);
        }

        // No client-level timeout: it would sever the long-lived stream.
        // Non-streaming calls apply the configured timeout per request.
        let http = Client::builder().build().map_err(StreamError::from)?;
        Ok(Self {
            http,
            headers,
            config,
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Drives the resumable stream until cancelled.
    ///
    /// Connects with the current offset, hands each decoded batch to
    /// `on_batch`, and advances the offset to the server-supplied value. Any
    /// transport error or stream termination closes the connection and
    /// reopens it after `min(1000ms * 2^retry, 30000ms)`; the retry counter
    /// resets to zero on every decoded batch. Retries never stop while the
    /// session remains open — the only exit is the cancellation signal.
    pub async fn run<F>(
        &self,
        session_id: &str,
        start_offset: u64,
        cancellation: Option<&CancellationSignal>,
        mut on_batch: F,
    ) where
        F: FnMut(StreamBatch),
    {
        let mut offset = start_offset;
        let mut retry = 0u32;

        loop {
            if is_cancelled(cancellation) {
                return;
            }

            match self
                .stream_once(session_id, &mut offset, &mut retry, cancellation, &mut on_batch)
                .await
            {
                Ok(()) => {
                    tracing::debug!(session_id, offset, "stream closed; reconnecting");
                }
                Err(StreamError::Cancelled) => return,
                Err(error) => {
                    tracing::warn!(session_id, offset, %error, "stream failed; reconnecting");
                }
            }

            let delay = reconnect_delay(retry);
            retry = retry.saturating_add(1);
            if sleep_or_cancel(delay, cancellation).await.is_err() {
                return;
            }
        }
    }

    async fn stream_once<F>(
        &self,
        session_id: &str,
        offset: &mut u64,
        retry: &mut u32,
        cancellation: Option<&CancellationSignal>,
        on_batch: &mut F,
    ) -> Result<(), StreamError>
    where
        F: FnMut(StreamBatch),
    {
        let url = stream_url(&self.config.base_url, session_id, *offset);
        let request = self.http.get(&url).headers(self.headers.clone()).send();
        let response = await_or_cancel(request, cancellation).await??;

        if !response.status().is_success() {
            return Err(StreamError::Status {
                status: response.status(),
                url,
            });
        }

        let mut bytes = response.bytes_stream();
        let mut parser = SseFrameParser::default();

        loop {
            let Some(chunk) = await_or_cancel(bytes.next(), cancellation).await? else {
                break;
            };
            let chunk = chunk.map_err(StreamError::from)?;

            for event in parser.feed(&chunk) {
                match event {
                    StreamEvent::Messages(batch) => {
                        *retry = 0;
                        *offset = (*offset).max(batch.offset);
                        on_batch(batch);
                    }
                    StreamEvent::Heartbeat => {}
                }
            }

            if is_cancelled(cancellation) {
                return Err(StreamError::Cancelled);
            }
        }

        Ok(())
    }

    /// One-shot fetch of the session's subagent correlation rows.
    pub async fn fetch_subagents(
        &self,
        session_id: &str,
    ) -> Result<Vec<SubagentInfo>, StreamError> {
        let url = subagents_url(&self.config.base_url, session_id);
        let mut request = self.http.get(&url).headers(self.headers.clone());
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(StreamError::Status {
                status: response.status(),
                url,
            });
        }

        Ok(response.json::<Vec<SubagentInfo>>().await?)
    }
}

fn is_cancelled(cancellation: Option<&CancellationSignal>) -> bool {
    cancellation.is_some_and(|signal| signal.load(Ordering::Acquire))
}

/// Sleeps for `delay`, returning `Err(())` if cancelled mid-wait.
async fn sleep_or_cancel(
    delay: Duration,
    cancellation: Option<&CancellationSignal>,
) -> Result<(), ()> {
    match await_or_cancel(tokio::time::sleep(delay), cancellation).await {
        Ok(()) => Ok(()),
        Err(_) => Err(()),
    }
}

async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancellationSignal>,
) -> Result<F::Output, StreamError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = Box::pin(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(StreamError::Cancelled);
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(StreamError::Cancelled);
            }
            return Ok(output);
        }
    }
}
