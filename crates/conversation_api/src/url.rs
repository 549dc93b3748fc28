/// Default base URL of a locally running session server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:12001";

/// Strips trailing slashes so path joins stay predictable.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Resumable stream endpoint for one session, carrying the held offset.
#[must_use]
pub fn stream_url(base_url: &str, session_id: &str, offset: u64) -> String {
    format!(
        "{}/api/conversation/{}/stream?offset={}",
        normalize_base_url(base_url),
        session_id,
        offset
    )
}

/// One-shot subagent correlation fetch for one session.
#[must_use]
pub fn subagents_url(base_url: &str, session_id: &str) -> String {
    format!(
        "{}/api/conversation/{}/subagents",
        normalize_base_url(base_url),
        session_id
    )
}
