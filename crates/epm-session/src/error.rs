use thiserror::Error;

use epm_config::{ConfigError, ServiceError, ServiceKey};

#[derive(Debug, Error)]
pub enum SessionError {
    /// The session was built without the requested service.
    #[error("capability absent: this session has no '{0}' service")]
    CapabilityAbsent(ServiceKey),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{key} service failed: {source}")]
    Service {
        key: ServiceKey,
        #[source]
        source: ServiceError,
    },

    #[error("package {package} has no content URI")]
    MissingUri { package: String },
}

impl SessionError {
    pub fn service(key: ServiceKey, source: ServiceError) -> Self {
        Self::Service { key, source }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
