/// Errors produced while turning compiler output into a manifest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Caller-supplied package data was rejected before any I/O.
    #[error("{0}")]
    UserInput(String),

    #[error("link reference {name} at offset {offset} falls outside bytecode of {len} hex chars")]
    LinkReference {
        name: String,
        offset: usize,
        len: usize,
    },

    #[error("bytecode is not ASCII hex")]
    Bytecode,

    #[error("metadata of contract {contract} is malformed: {reason}")]
    Metadata { contract: String, reason: String },

    /// Every schema error, joined by `"; "`.
    #[error("manifest failed schema validation: {0}")]
    Schema(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    pub fn user_input(message: impl Into<String>) -> Self {
        Self::UserInput(message.into())
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
