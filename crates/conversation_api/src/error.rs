use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("invalid header '{key}' in stream configuration")]
    InvalidHeader { key: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("request was cancelled")]
    Cancelled,
}
