use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A payload referenced an object the live session does not know.
    #[error("unresolved handle: {0}")]
    UnresolvedHandle(String),
}

pub type CodecResult<T> = Result<T, CodecError>;
