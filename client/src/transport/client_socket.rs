use std::{mem, net::SocketAddr, time::Instant};

use log::{debug, info, warn};

use fragnet_shared::{
    Link, PacketReceiver, PacketSender, PacketType, PeerId, PeerLink, RecvError, Socket,
    SocketConfig, SocketError, SocketEvent, SocketState, SocketStatus, StatusObserver,
};

/// Connecting side of a connection. Talks to exactly one server, which it
/// addresses as [`PeerId::HOST`].
pub struct ClientSocket {
    config: SocketConfig,
    server_addr: SocketAddr,
    link: Box<dyn Link>,
    state: SocketState,
    io: Option<(Box<dyn PacketSender>, Box<dyn PacketReceiver>)>,
    server: PeerLink,
    // id the server assigned us during the handshake
    peer_id: Option<PeerId>,
    last_request: Option<Instant>,
    pending: Vec<SocketEvent>,
}

impl ClientSocket {
    pub fn new(config: SocketConfig, server_addr: SocketAddr, link: Box<dyn Link>) -> Self {
        Self {
            config,
            server_addr,
            link,
            state: SocketState::new(),
            io: None,
            server: PeerLink::new(server_addr),
            peer_id: None,
            last_request: None,
            pending: Vec::new(),
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.link.local_addr()
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// The id the server knows this client by, once connected
    pub fn peer_id(&self) -> Option<PeerId> {
        self.peer_id
    }

    fn send_frame(&mut self, packet_type: PacketType, payload: &[u8]) -> bool {
        let Some((sender, _)) = self.io.as_ref() else {
            return false;
        };
        let sent = sender
            .send(&self.server_addr, &packet_type.frame(payload))
            .is_ok();
        if sent {
            self.server.mark_sent();
        }
        sent
    }

    fn receive_all(&mut self) -> Result<Vec<(SocketAddr, Box<[u8]>)>, RecvError> {
        let Some((_, receiver)) = self.io.as_mut() else {
            return Ok(Vec::new());
        };
        let mut datagrams = Vec::new();
        loop {
            match receiver.receive() {
                Ok(Some(datagram)) => datagrams.push(datagram),
                Ok(None) => return Ok(datagrams),
                Err(error) => return Err(error),
            }
        }
    }

    fn request_connection(&mut self) {
        if self.send_frame(PacketType::ConnectRequest, &[]) {
            debug!("Sent connect request to {}", self.server_addr);
        }
        self.last_request = Some(Instant::now());
    }

    fn handle_server_datagram(&mut self, datagram: Box<[u8]>) {
        self.server.mark_heard();
        let (packet_type, payload) = match PacketType::unframe(&datagram) {
            Ok(frame) => frame,
            Err(error) => {
                warn!("Dropping datagram from server: {}", error);
                return;
            }
        };
        let connected = self.state.status() == SocketStatus::Connected;
        match (packet_type, connected) {
            (PacketType::ConnectAccept, false) => {
                let id = <[u8; 8]>::try_from(payload)
                    .map(u64::from_le_bytes)
                    .unwrap_or_default();
                self.peer_id = Some(PeerId(id));
                self.last_request = None;
                self.state.set_status(SocketStatus::Connected);
                info!("Connected to {} as {}", self.server_addr, PeerId(id));
                self.pending.push(SocketEvent::Connected(PeerId::HOST));
            }
            (PacketType::ConnectReject, false) => {
                self.stop("connection rejected");
            }
            (PacketType::Data, true) => self.pending.push(SocketEvent::Packet {
                peer: PeerId::HOST,
                payload: payload.into(),
            }),
            (PacketType::Disconnect, true) => {
                let reason = String::from_utf8_lossy(payload).into_owned();
                self.shutdown(reason, false);
            }
            (PacketType::Heartbeat, _) => {}
            (packet_type, _) => {
                debug!(
                    "Ignoring {:?} from server while {}",
                    packet_type,
                    self.state.status()
                );
            }
        }
    }

    fn check_server(&mut self) {
        match self.state.status() {
            SocketStatus::Starting => {
                if self.server.timed_out(self.config.disconnection_timeout) {
                    self.stop("timed out");
                    return;
                }
                let interval = self.config.handshake_resend_interval;
                let resend = self
                    .last_request
                    .map_or(true, |sent| sent.elapsed() >= interval);
                if resend {
                    self.request_connection();
                }
            }
            SocketStatus::Connected => {
                if self.server.timed_out(self.config.disconnection_timeout) {
                    self.stop("timed out");
                    return;
                }
                if self.server.needs_heartbeat(self.config.heartbeat_interval) {
                    self.send_frame(PacketType::Heartbeat, &[]);
                }
            }
            _ => {}
        }
    }

    // Every disconnect, local or remote, ends up here
    fn shutdown(&mut self, reason: String, notify_remote: bool) {
        if !self.state.begin_stop() {
            return;
        }
        let was_running = self.io.is_some();
        let was_connected = self.peer_id.take().is_some();
        if was_connected && notify_remote {
            self.send_frame(PacketType::Disconnect, reason.as_bytes());
        }
        self.io = None;
        self.last_request = None;
        self.link.close();
        if was_running {
            info!("Disconnected from {}: {}", self.server_addr, reason);
            self.pending.push(SocketEvent::Disconnected {
                peer: PeerId::HOST,
                reason,
            });
        }
        self.state.set_status(SocketStatus::Stopped);
    }
}

impl Socket for ClientSocket {
    fn status(&self) -> SocketStatus {
        self.state.status()
    }

    fn set_status_observer(&mut self, observer: StatusObserver) {
        self.state.set_observer(observer);
    }

    /// Opens the link and begins the handshake. The socket stays `Starting`
    /// until the server accepts.
    fn start(&mut self) -> Result<(), SocketError> {
        self.state.begin_start()?;
        match self.link.open() {
            Ok(io) => {
                self.io = Some(io);
                self.server = PeerLink::new(self.server_addr);
                self.request_connection();
                Ok(())
            }
            Err(error) => {
                warn!("Client link failed to open: {}", error);
                self.state.set_status(SocketStatus::Stopped);
                Err(error.into())
            }
        }
    }

    fn stop(&mut self, reason: &str) {
        self.shutdown(reason.to_string(), true);
    }

    fn tick(&mut self) -> Vec<SocketEvent> {
        if self.io.is_some() {
            match self.receive_all() {
                Ok(datagrams) => {
                    for (address, datagram) in datagrams {
                        if self.io.is_none() {
                            break;
                        }
                        if address == self.server_addr {
                            self.handle_server_datagram(datagram);
                        } else {
                            self.pending.push(SocketEvent::Unaddressed {
                                address,
                                payload: datagram,
                            });
                        }
                    }
                    self.check_server();
                }
                Err(error) => {
                    warn!("Client link stopped delivering packets: {}", error);
                    self.stop("link closed");
                }
            }
        }
        mem::take(&mut self.pending)
    }

    fn send(&mut self, peers: &[PeerId], payload: &[u8]) {
        if self.state.status() != SocketStatus::Connected {
            warn!("Dropping send, socket is {}", self.state.status());
            return;
        }
        for peer in peers {
            if *peer != PeerId::HOST {
                warn!("Dropping send to {}, a client only reaches the server", peer);
                continue;
            }
            if !self.send_frame(PacketType::Data, payload) {
                self.shutdown("send failed".to_string(), false);
                return;
            }
        }
    }

    fn send_unaddressed(&mut self, payload: &[u8], address: SocketAddr) {
        let Some((sender, _)) = self.io.as_ref() else {
            warn!("Dropping unaddressed send to {}, socket is not running", address);
            return;
        };
        if sender.send(&address, payload).is_err() {
            warn!("Unaddressed send to {} failed", address);
        }
    }

    fn disconnect(&mut self, peer: PeerId, reason: &str) {
        if peer != PeerId::HOST {
            debug!("{} is not connected", peer);
            return;
        }
        self.stop(reason);
    }
}
