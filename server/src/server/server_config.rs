use std::default::Default;

use fragnet_shared::SocketConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Heartbeat and timeout settings for client connections
    pub socket: SocketConfig,
    /// Connect requests beyond this many peers are rejected
    pub max_peers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket: SocketConfig::default(),
            max_peers: 16,
        }
    }
}
