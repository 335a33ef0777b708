use std::net::SocketAddr;

use thiserror::Error;

use crate::transport::status::SocketStatus;

/// Errors that can occur while opening or using a link
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Link could not bind its local address
    #[error("Failed to bind {address}: {reason}")]
    Bind {
        address: SocketAddr,
        reason: String,
    },

    /// Another in-process link already owns the address
    #[error("Address {address} is already bound on this packet channel")]
    AddressInUse {
        address: SocketAddr,
    },

    /// Link was used after it was closed
    #[error("Link is closed")]
    Closed,
}

/// Errors returned by socket lifecycle calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocketError {
    /// `start()` was called while the socket is running
    #[error("Socket cannot start while {status}. Call `stop()` first")]
    AlreadyStarted {
        status: SocketStatus,
    },

    /// Link failed to open
    #[error("Socket link failed: {0}")]
    Link(#[from] TransportError),
}

/// A datagram could not be handed to the link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to send packet")]
pub struct SendError;

/// The link can no longer deliver datagrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to receive packet")]
pub struct RecvError;
