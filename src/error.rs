/// Error types for rumorkv.
///
/// The library never surfaces raw errors across the transport boundary;
/// handlers translate `KvError` into the wire-level catch-all response
/// and log the underlying cause.
use crate::clock::NodeId;
use thiserror::Error;

/// The main error type for rumorkv operations.
#[derive(Error, Debug)]
pub enum KvError {
    /// JSON encoding or decoding failed (peer payloads, log serialization).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested id has no row in the cluster table.
    #[error("node {0} is not in the cluster table")]
    UnknownNode(NodeId),

    /// The transport listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// Anything that should never happen during normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for rumorkv operations.
pub type KvResult<T> = Result<T, KvError>;
