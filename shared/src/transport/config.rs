use std::time::Duration;

/// Contains config properties shared by server and client sockets
#[derive(Clone, Debug)]
pub struct SocketConfig {
    /// Maximum amount of time a peer may go silent before it is disconnected
    pub disconnection_timeout: Duration,
    /// Interval at which heartbeat packets are sent when nothing else was
    /// sent to a peer
    pub heartbeat_interval: Duration,
    /// Interval at which a client repeats its connect request until the
    /// server answers
    pub handshake_resend_interval: Duration,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            disconnection_timeout: Duration::from_secs(30),
            heartbeat_interval: Duration::from_secs(4),
            handshake_resend_interval: Duration::from_millis(250),
        }
    }
}
