use std::{collections::HashMap, mem, net::SocketAddr};

use log::{debug, info, warn};

use fragnet_shared::{
    Link, PacketReceiver, PacketSender, PacketType, PeerId, PeerLink, RecvError, Socket, SocketConfig,
    SocketError, SocketEvent, SocketState, SocketStatus, StatusObserver,
};

/// Listening side of a connection. Accepts clients over any [`Link`],
/// assigns them [`PeerId`]s and keeps them alive with heartbeats.
pub struct ServerSocket {
    config: SocketConfig,
    max_peers: usize,
    link: Box<dyn Link>,
    state: SocketState,
    io: Option<(Box<dyn PacketSender>, Box<dyn PacketReceiver>)>,
    peers: HashMap<PeerId, PeerLink>,
    addresses: HashMap<SocketAddr, PeerId>,
    next_peer: u64,
    pending: Vec<SocketEvent>,
}

impl ServerSocket {
    pub fn new(config: SocketConfig, max_peers: usize, link: Box<dyn Link>) -> Self {
        Self {
            config,
            max_peers,
            link,
            state: SocketState::new(),
            io: None,
            peers: HashMap::new(),
            addresses: HashMap::new(),
            next_peer: PeerId::HOST.0 + 1,
            pending: Vec::new(),
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.link.local_addr()
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn peer_address(&self, peer: &PeerId) -> Option<SocketAddr> {
        self.peers.get(peer).map(|link| link.address())
    }

    fn send_frame(&self, address: &SocketAddr, packet_type: PacketType, payload: &[u8]) -> bool {
        let Some((sender, _)) = self.io.as_ref() else {
            return false;
        };
        sender.send(address, &packet_type.frame(payload)).is_ok()
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

    fn accept(&mut self, address: SocketAddr) {
        if self.peers.len() >= self.max_peers {
            info!("Rejecting {}, server is full", address);
            self.send_frame(&address, PacketType::ConnectReject, &[]);
            return;
        }
        let peer = PeerId(self.next_peer);
        self.next_peer += 1;

        self.peers.insert(peer, PeerLink::new(address));
        self.addresses.insert(address, peer);
        self.send_frame(&address, PacketType::ConnectAccept, &peer.0.to_le_bytes());
        info!("{} connected from {}", peer, address);
        self.pending.push(SocketEvent::Connected(peer));
    }

    fn handle_peer_datagram(&mut self, peer: PeerId, datagram: Box<[u8]>) {
        if let Some(link) = self.peers.get_mut(&peer) {
            link.mark_heard();
        }
        let (packet_type, payload) = match PacketType::unframe(&datagram) {
            Ok(frame) => frame,
            Err(error) => {
                warn!("Dropping datagram from {}: {}", peer, error);
                return;
            }
        };
        match packet_type {
            PacketType::Data => self.pending.push(SocketEvent::Packet {
                peer,
                payload: payload.into(),
            }),
            PacketType::Heartbeat => {}
            PacketType::ConnectRequest => {
                // our accept got lost, the client is still asking
                if let Some(address) = self.peer_address(&peer) {
                    self.send_frame(&address, PacketType::ConnectAccept, &peer.0.to_le_bytes());
                }
            }
            PacketType::Disconnect => {
                let reason = String::from_utf8_lossy(payload).into_owned();
                self.remove_peer(peer, reason, false);
            }
            PacketType::ConnectAccept | PacketType::ConnectReject => {
                debug!("Ignoring {:?} from {}", packet_type, peer);
            }
        }
    }

    fn handle_unknown_datagram(&mut self, address: SocketAddr, datagram: Box<[u8]>) {
        if let Ok((PacketType::ConnectRequest, _)) = PacketType::unframe(&datagram) {
            self.accept(address);
            return;
        }
        self.pending.push(SocketEvent::Unaddressed {
            address,
            payload: datagram,
        });
    }

    // Every disconnect, local or remote, ends up here
    fn remove_peer(&mut self, peer: PeerId, reason: String, notify_remote: bool) {
        let Some(link) = self.peers.remove(&peer) else {
            debug!("{} is not connected", peer);
            return;
        };
        self.addresses.remove(&link.address());
        if notify_remote {
            self.send_frame(&link.address(), PacketType::Disconnect, reason.as_bytes());
        }
        info!("{} disconnected: {}", peer, reason);
        self.pending.push(SocketEvent::Disconnected { peer, reason });
    }

    fn check_peers(&mut self) {
        let timeout = self.config.disconnection_timeout;
        let timed_out: Vec<PeerId> = self
            .peers
            .iter()
            .filter(|(_, link)| link.timed_out(timeout))
            .map(|(peer, _)| *peer)
            .collect();
        for peer in timed_out {
            self.remove_peer(peer, "timed out".to_string(), true);
        }

        let interval = self.config.heartbeat_interval;
        let idle: Vec<(PeerId, SocketAddr)> = self
            .peers
            .iter()
            .filter(|(_, link)| link.needs_heartbeat(interval))
            .map(|(peer, link)| (*peer, link.address()))
            .collect();
        for (peer, address) in idle {
            if self.send_frame(&address, PacketType::Heartbeat, &[]) {
                if let Some(link) = self.peers.get_mut(&peer) {
                    link.mark_sent();
                }
            }
        }
    }
}

impl Socket for ServerSocket {
    fn status(&self) -> SocketStatus {
        self.state.status()
    }

    fn set_status_observer(&mut self, observer: StatusObserver) {
        self.state.set_observer(observer);
    }

    fn start(&mut self) -> Result<(), SocketError> {
        self.state.begin_start()?;
        match self.link.open() {
            Ok(io) => {
                self.io = Some(io);
                self.state.set_status(SocketStatus::Listening);
                info!("Server listening on {}", self.link.local_addr());
                Ok(())
            }
            Err(error) => {
                warn!("Server link failed to open: {}", error);
                self.state.set_status(SocketStatus::Stopped);
                Err(error.into())
            }
        }
    }

    fn stop(&mut self, reason: &str) {
        if !self.state.begin_stop() {
            return;
        }
        let peers: Vec<PeerId> = self.peers.keys().copied().collect();
        for peer in peers {
            self.remove_peer(peer, reason.to_string(), true);
        }
        self.io = None;
        self.link.close();
        self.state.set_status(SocketStatus::Stopped);
    }

    fn tick(&mut self) -> Vec<SocketEvent> {
        if self.io.is_some() {
            match self.receive_all() {
                Ok(datagrams) => {
                    for (address, datagram) in datagrams {
                        match self.addresses.get(&address).copied() {
                            Some(peer) => self.handle_peer_datagram(peer, datagram),
                            None => self.handle_unknown_datagram(address, datagram),
                        }
                    }
                    self.check_peers();
                }
                Err(error) => {
                    warn!("Server link stopped delivering packets: {}", error);
                    self.stop("link closed");
                }
            }
        }
        mem::take(&mut self.pending)
    }

    fn send(&mut self, peers: &[PeerId], payload: &[u8]) {
        let Some((sender, _)) = self.io.as_ref() else {
            warn!("Dropping send to {} peers, socket is {}", peers.len(), self.state.status());
            return;
        };
        let datagram = PacketType::Data.frame(payload);

        let mut failed = Vec::new();
        for peer in peers {
            let Some(link) = self.peers.get_mut(peer) else {
                warn!("Dropping send to {}, not connected", peer);
                continue;
            };
            if sender.send(&link.address(), &datagram).is_ok() {
                link.mark_sent();
            } else {
                failed.push(*peer);
            }
        }
        for peer in failed {
            self.remove_peer(peer, "send failed".to_string(), false);
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
        self.remove_peer(peer, reason.to_string(), true);
    }
}
