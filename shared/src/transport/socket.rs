use std::{fmt, net::SocketAddr};

use crate::transport::{
    error::SocketError,
    status::{SocketStatus, StatusObserver},
};

/// Identifies a connected peer. Assigned by the server at handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl PeerId {
    /// How a client addresses the server it is connected to.
    pub const HOST: PeerId = PeerId(0);
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer {}", self.0)
    }
}

/// What a socket observed during one `tick()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SocketEvent {
    Connected(PeerId),
    Disconnected { peer: PeerId, reason: String },
    /// A data payload from a connected peer, with framing removed.
    Packet { peer: PeerId, payload: Box<[u8]> },
    /// A datagram from an address that is not a peer.
    Unaddressed { address: SocketAddr, payload: Box<[u8]> },
}

/// Uniform lifecycle and I/O surface of every transport.
///
/// Nothing here blocks. Inbound traffic, heartbeats and timeouts are only
/// processed inside [`Socket::tick`].
pub trait Socket {
    fn status(&self) -> SocketStatus;

    /// Installs the single status observer, replacing any previous one.
    fn set_status_observer(&mut self, observer: StatusObserver);

    /// Opens the link. Only valid while Unstarted or Stopped.
    fn start(&mut self) -> Result<(), SocketError>;

    /// Disconnects every peer with `reason` and closes the link. Does nothing
    /// when already Stopped.
    fn stop(&mut self, reason: &str);

    fn tick(&mut self) -> Vec<SocketEvent>;

    /// Sends a data payload to each of `peers`. Unknown peers are skipped.
    fn send(&mut self, peers: &[PeerId], payload: &[u8]);

    /// Sends a raw datagram outside of any connection.
    fn send_unaddressed(&mut self, payload: &[u8], address: SocketAddr);

    /// Drops one peer, exactly as if it had disconnected itself.
    fn disconnect(&mut self, peer: PeerId, reason: &str);
}
