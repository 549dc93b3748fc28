use conversation_api::{normalize_base_url, stream_url, subagents_url};

#[test]
fn normalize_strips_trailing_slashes_and_whitespace() {
    assert_eq!(
        normalize_base_url(" http://127.0.0.1:12001/ "),
        "http://127.0.0.1:12001"
    );
    assert_eq!(
        normalize_base_url("https://relay.example//"),
        "https://relay.example"
    );
    assert_eq!(
        normalize_base_url("http://127.0.0.1:12001"),
        "http://127.0.0.1:12001"
    );
}

#[test]
fn stream_url_carries_session_and_offset() {
    assert_eq!(
        stream_url("http://127.0.0.1:12001/", "abc-123", 57),
        "http://127.0.0.1:12001/api/conversation/abc-123/stream?offset=57"
    );
}

#[test]
fn fresh_sessions_resume_from_zero() {
    assert_eq!(
        stream_url("http://127.0.0.1:12001", "abc-123", 0),
        "http://127.0.0.1:12001/api/conversation/abc-123/stream?offset=0"
    );
}

#[test]
fn subagents_url_targets_the_session() {
    assert_eq!(
        subagents_url("http://127.0.0.1:12001", "abc-123"),
        "http://127.0.0.1:12001/api/conversation/abc-123/subagents"
    );
}
