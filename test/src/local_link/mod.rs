//! In-memory links for end-to-end testing.
//! Routes datagrams between server and clients without network I/O.

mod reordering;

pub use reordering::ReorderingLink;

use std::net::{Ipv4Addr, SocketAddr};

use fragnet_shared::{ChannelLink, PacketChannel};

const FAKE_SERVER_PORT: u16 = 54321;
const FAKE_CLIENT_PORT: u16 = 12345;

/// A server link and any number of client links on one [`PacketChannel`].
pub struct LocalLinkPair {
    channel: PacketChannel,
}

impl LocalLinkPair {
    pub fn new() -> Self {
        Self {
            channel: PacketChannel::new(),
        }
    }

    pub fn channel(&self) -> &PacketChannel {
        &self.channel
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, FAKE_SERVER_PORT))
    }

    /// Address of the `index`th client
    pub fn client_addr(&self, index: u16) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, FAKE_CLIENT_PORT + index))
    }

    pub fn server_link(&self) -> ChannelLink {
        self.channel.link(self.server_addr())
    }

    pub fn client_link(&self, index: u16) -> ChannelLink {
        self.channel.link(self.client_addr(index))
    }
}

impl Default for LocalLinkPair {
    fn default() -> Self {
        Self::new()
    }
}
