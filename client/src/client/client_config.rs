use std::{
    default::Default,
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

use fragnet_shared::SocketConfig;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Heartbeat, timeout and handshake settings for the server connection
    pub socket: SocketConfig,
    /// Address of the server to connect to
    pub server_addr: SocketAddr,
    /// How long updates for an entity that has not been spawned yet are
    /// kept around
    pub waitlist_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket: SocketConfig::default(),
            server_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 27015)),
            waitlist_ttl: Duration::from_secs(60),
        }
    }
}
