use epm_config::ServiceError;
use epm_types::{ContentId, TypeError};

/// Errors raised by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("content not found: {0}")]
    NotFound(ContentId),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ipfs node returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("ipfs node returned an unreadable response: {0}")]
    Response(String),

    #[error("invalid content id from node: {0}")]
    ContentId(#[from] TypeError),

    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => ServiceError::NotFound(id.to_string()),
            StorageError::Response(reason) => ServiceError::Decode(reason),
            StorageError::ContentId(e) => ServiceError::Decode(e.to_string()),
            other => ServiceError::Transport(other.to_string()),
        }
    }
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
