use thiserror::Error;

use fragnet_shared::{ApplyError, DecodeError, SocketError};

/// Errors reported by the client
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FragnetClientError {
    /// Socket failed to start
    #[error("Client socket error: {0}")]
    Socket(#[from] SocketError),

    /// Replication packet from the server could not be decoded
    #[error("Dropped replication packet: {0}")]
    Decode(#[from] DecodeError),

    /// Replicated message could not be applied to the local simulation
    #[error("Failed to apply replicated message: {0}")]
    Apply(#[from] ApplyError),
}
