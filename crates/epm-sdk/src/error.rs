use std::path::PathBuf;

use thiserror::Error;

use epm_manifest::PipelineError;
use epm_session::SessionError;

#[derive(Debug, Error)]
pub enum SdkError {
    /// Rejected input, shown to the user as is.
    #[error("{0}")]
    UserInput(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("no imported source pending at {0}")]
    NotPending(String),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("cannot render config: {0}")]
    ConfigRender(String),
}

impl SdkError {
    pub fn user_input(message: impl Into<String>) -> Self {
        Self::UserInput(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
