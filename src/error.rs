use reqwest::header::InvalidHeaderValue;
use reqwest::StatusCode;
use thiserror::Error;

pub type NotionResult<T> = Result<T, NotionError>;

/// Failures talking to the Notion API or decoding what it sent back.
#[derive(Debug, Error)]
pub enum NotionError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("notion returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("page {page_id} has no property named {property:?}")]
    MissingProperty { page_id: String, property: String },

    #[error("property {property:?} on page {page_id} is not a {expected} property")]
    UnexpectedProperty {
        page_id: String,
        property: String,
        expected: &'static str,
    },
}

impl NotionError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            NotionError::Status { status, .. } => Some(*status),
            NotionError::Transport(err) => err.status(),
            _ => None,
        }
    }
}
