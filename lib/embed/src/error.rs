use std::time::Duration;
use thiserror::Error;

/// Why an embedding could not be produced.
///
/// Every variant is recoverable from the caller's point of view: the match
/// engine turns it into "no match" and the indexer skips the entry.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Embedding service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("Embedding service returned no vector")]
    EmptyResponse,

    #[error("Invalid embedding configuration: {0}")]
    Config(String),
}

impl From<reqwest_middleware::Error> for EmbedError {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(inner) => inner.into(),
            other => EmbedError::Http(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for EmbedError {
    fn from(e: reqwest::Error) -> Self {
        EmbedError::Http(e.to_string())
    }
}
