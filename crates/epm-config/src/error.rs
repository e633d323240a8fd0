use std::fmt;

/// A single option field that failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `ipfs.port`.
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Connector options failed validation. Carries every violation, not just
/// the first.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    pub connector: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// `true` if some violation concerns `path`.
    pub fn mentions(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid options for {} ({} violation{}): ",
            self.connector,
            self.violations.len(),
            if self.violations.len() == 1 { "" } else { "s" }
        )?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Errors raised while resolving or connecting services.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config value could not be resolved into a connector.
    #[error("configuration error for '{key}': {reason}")]
    Configuration { key: String, reason: String },

    /// Connector options failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Options were valid but the connector could not start its service.
    #[error("connector '{connector}' failed to initialize: {source}")]
    Init {
        connector: String,
        #[source]
        source: ServiceError,
    },
}

impl ConfigError {
    pub fn configuration(key: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn init(connector: impl Into<String>, source: ServiceError) -> Self {
        Self::Init {
            connector: connector.into(),
            source,
        }
    }
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures reported by a live service (storage, manifest codec, registry).
///
/// These are propagated unmodified; nothing in epm retries them.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The underlying transport failed (network, process, disk).
    #[error("transport error: {0}")]
    Transport(String),

    /// The requested content does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A value could not be encoded for storage.
    #[error("encode error: {0}")]
    Encode(String),

    /// Stored bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The service does not support the requested operation or format.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
