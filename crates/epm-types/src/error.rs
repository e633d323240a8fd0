use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid content identifier {value:?}: {reason}")]
    InvalidContentId { value: String, reason: String },

    #[error("invalid content URI {value:?}: {reason}")]
    InvalidUri { value: String, reason: String },

    #[error("invalid package name {name:?}: {reason}")]
    InvalidPackageName { name: String, reason: String },

    #[error("invalid blockchain URI {value:?}: {reason}")]
    InvalidChainUri { value: String, reason: String },
}
