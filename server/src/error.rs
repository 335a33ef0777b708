use thiserror::Error;

use fragnet_shared::{PeerId, SocketError};

/// Errors reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragnetServerError {
    /// Socket failed to start
    #[error("Server socket error: {0}")]
    Socket(#[from] SocketError),

    /// A client sent replication data, which only flows from the server
    #[error("Unexpected data packet of {length} bytes from {peer}. Clients do not send entity state")]
    UnexpectedData {
        peer: PeerId,
        length: usize,
    },
}
