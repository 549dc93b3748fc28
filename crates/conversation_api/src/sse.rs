use message_log::StreamBatch;

/// Decoded stream event after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A batch of messages plus the server's new resume offset.
    Messages(StreamBatch),
    /// Periodic keep-alive frame; carries no data the engine needs.
    Heartbeat,
}

/// Incremental parser for the named-event SSE stream.
///
/// Frames are separated by a blank line. Each frame's `event:` line selects
/// the handler and its `data:` lines are joined into the JSON payload.
/// Malformed frames and unknown event names are skipped, never fatal.
#[derive(Debug, Default)]
pub struct SseFrameParser {
    buffer: String,
}

impl SseFrameParser {
    /// Feed arbitrary bytes into the parser and drain complete events.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));
        // CRLF framing folds to LF. A trailing '\r' may be half of a pair
        // split across chunks; it stays buffered and folds on the next feed.
        if self.buffer.contains('\r') {
            self.buffer = self.buffer.replace("\r\n", "\n");
        }
        let mut events = Vec::new();

        while let Some(split) = self.buffer.find("\n\n") {
            let frame = self.buffer[..split].to_string();
            self.buffer.drain(0..split + 2);

            if let Some(event) = parse_frame(&frame) {
                events.push(event);
            }
        }

        events
    }

    /// Parse a complete SSE payload string in one shot.
    pub fn parse_frames(input: &str) -> Vec<StreamEvent> {
        let mut parser = Self::default();
        parser.feed(input.as_bytes())
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.trim().is_empty()
    }
}

fn parse_frame(frame: &str) -> Option<StreamEvent> {
    let mut event_name: Option<&str> = None;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in frame.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event_name = Some(name.trim());
        } else if let Some(data) = line.strip_prefix("data:") {
            data_lines.push(data.trim_start());
        }
    }

    match event_name? {
        "messages" => {
            let payload = data_lines.join("\n");
            match serde_json::from_str::<StreamBatch>(&payload) {
                Ok(batch) => Some(StreamEvent::Messages(batch)),
                Err(error) => {
                    tracing::debug!(%error, "skipping malformed messages frame");
                    None
                }
            }
        }
        "heartbeat" => Some(StreamEvent::Heartbeat),
        _ => None,
    }
}
