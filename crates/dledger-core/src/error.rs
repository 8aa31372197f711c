use dledger_codec::CodecError;
use dledger_store::StoreError;
use dledger_types::{ConnectionError, TypeError};

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A delivered operation carried a tag this ledger kind does not know.
    /// Indicates a version or serialization mismatch between replicas.
    #[error("unsupported operation type `{op_type}`")]
    UnknownOperation { op_type: String },

    #[error("malformed operation: {0}")]
    MalformedOperation(String),

    #[error("ledger is already attached")]
    AlreadyAttached,

    #[error("ledger is already initialized")]
    AlreadyInitialized,

    #[error("ledger is detached; delivered messages cannot be processed")]
    NotAttached,

    #[error("stashed operations are not supported by the ledger")]
    StashedOperationUnsupported,

    #[error("incompatible channel attributes: {0}")]
    IncompatibleAttributes(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),
}

impl From<TypeError> for LedgerError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnknownOperation(op_type) => Self::UnknownOperation { op_type },
            TypeError::MalformedOperation(reason) => Self::MalformedOperation(reason),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
