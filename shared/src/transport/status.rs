use std::fmt;

use log::info;

use crate::transport::error::SocketError;

/// Lifecycle of a socket.
///
/// `Unstarted -> Starting -> Listening | Connected -> Stopping -> Stopped`,
/// and `Stopped -> Starting` again on restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SocketStatus {
    Unstarted,
    Starting,
    /// Server side, accepting peers.
    Listening,
    /// Client side, handshake completed.
    Connected,
    Stopping,
    Stopped,
}

impl SocketStatus {
    pub fn is_running(self) -> bool {
        matches!(
            self,
            SocketStatus::Starting | SocketStatus::Listening | SocketStatus::Connected
        )
    }
}

impl fmt::Display for SocketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SocketStatus::Unstarted => "unstarted",
            SocketStatus::Starting => "starting",
            SocketStatus::Listening => "listening",
            SocketStatus::Connected => "connected",
            SocketStatus::Stopping => "stopping",
            SocketStatus::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Called with `(old, new)` whenever the status actually changes.
pub type StatusObserver = Box<dyn FnMut(SocketStatus, SocketStatus) + Send>;

/// Status machine shared by every socket implementation.
pub struct SocketState {
    status: SocketStatus,
    observer: Option<StatusObserver>,
}

impl SocketState {
    pub fn new() -> Self {
        Self {
            status: SocketStatus::Unstarted,
            observer: None,
        }
    }

    pub fn status(&self) -> SocketStatus {
        self.status
    }

    /// Replaces the observer. There is a single slot.
    pub fn set_observer(&mut self, observer: StatusObserver) {
        self.observer = Some(observer);
    }

    /// Moves to `status` and notifies the observer. Returns `false` and does
    /// nothing when the socket is already in that status.
    pub fn set_status(&mut self, status: SocketStatus) -> bool {
        if self.status == status {
            return false;
        }
        let old = self.status;
        self.status = status;
        info!("Socket {} -> {}", old, status);
        if let Some(observer) = self.observer.as_mut() {
            observer(old, status);
        }
        true
    }

    /// Enters `Starting`. Only allowed from `Unstarted` or `Stopped`.
    pub fn begin_start(&mut self) -> Result<(), SocketError> {
        match self.status {
            SocketStatus::Unstarted | SocketStatus::Stopped => {
                self.set_status(SocketStatus::Starting);
                Ok(())
            }
            status => Err(SocketError::AlreadyStarted { status }),
        }
    }

    /// Enters `Stopping`. Returns `false` when already stopped, in which
    /// case the caller has nothing to tear down.
    pub fn begin_stop(&mut self) -> bool {
        if self.status == SocketStatus::Stopped {
            return false;
        }
        self.set_status(SocketStatus::Stopping);
        true
    }
}

impl Default for SocketState {
    fn default() -> Self {
        Self::new()
    }
}
