/// Errors for registry handles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid registry address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid provider URL '{url}': {reason}")]
    InvalidProvider { url: String, reason: String },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, RegistryError>;
