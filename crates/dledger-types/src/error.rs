use thiserror::Error;

use crate::client::ClientId;

/// Errors produced while interpreting wire types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The operation carried a `type` tag outside the known set.
    #[error("unsupported operation type `{0}`")]
    UnknownOperation(String),

    /// The operation is structurally invalid (missing tag or payload).
    #[error("malformed operation: {0}")]
    MalformedOperation(String),
}

/// Errors reported by a [`DeltaConnection`](crate::DeltaConnection).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The sequencer no longer knows this client.
    #[error("unknown client {0}")]
    UnknownClient(ClientId),
}
