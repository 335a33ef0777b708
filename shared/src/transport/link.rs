use std::net::SocketAddr;

use crate::transport::error::{RecvError, SendError, TransportError};

/// Sends datagrams through a link
pub trait PacketSender: Send + Sync {
    /// Sends a packet to `address`
    fn send(&self, address: &SocketAddr, payload: &[u8]) -> Result<(), SendError>;
}

/// Receives datagrams from a link
pub trait PacketReceiver: Send {
    /// Next pending packet with its source address, if any. Never blocks
    fn receive(&mut self) -> Result<Option<(SocketAddr, Box<[u8]>)>, RecvError>;
}

/// A datagram link a socket runs on. Opening it again after a stop gives a
/// fresh sender/receiver pair.
pub trait Link: Send {
    fn local_addr(&self) -> SocketAddr;

    fn open(&mut self) -> Result<(Box<dyn PacketSender>, Box<dyn PacketReceiver>), TransportError>;

    /// Releases whatever `open` acquired
    fn close(&mut self);
}
