use std::{
    net::SocketAddr,
    time::{Duration, Instant},
};

/// Liveness bookkeeping for one remote end of a connection.
#[derive(Clone, Debug)]
pub struct PeerLink {
    address: SocketAddr,
    last_heard: Instant,
    last_sent: Instant,
}

impl PeerLink {
    pub fn new(address: SocketAddr) -> Self {
        let now = Instant::now();
        Self {
            address,
            last_heard: now,
            last_sent: now,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn mark_heard(&mut self) {
        self.last_heard = Instant::now();
    }

    pub fn mark_sent(&mut self) {
        self.last_sent = Instant::now();
    }

    /// Nothing has been received from the peer for longer than `timeout`.
    pub fn timed_out(&self, timeout: Duration) -> bool {
        self.last_heard.elapsed() > timeout
    }

    /// Nothing has been sent to the peer for at least `interval`.
    pub fn needs_heartbeat(&self, interval: Duration) -> bool {
        self.last_sent.elapsed() >= interval
    }
}
