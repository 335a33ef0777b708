use std::{mem, net::SocketAddr};

use log::{debug, info};

use fragnet_shared::{
    EntityMessage, EquippableCatalog, HostType, Link, PeerId, ReplicationPacket, Simulation,
    Socket, SocketEvent, SocketStatus, StatusObserver, Tick,
};

use crate::{
    events::ServerEvents, server::server_config::ServerConfig, transport::ServerSocket,
    FragnetServerError,
};

/// The authoritative host. Owns the host [`Simulation`] and the socket
/// clients connect to, and replicates every property change to every
/// connected peer once per tick.
pub struct Server {
    config: ServerConfig,
    socket: Box<dyn Socket>,
    simulation: Simulation,
    peers: Vec<PeerId>,
    // connected since the last tick, they get a full snapshot
    fresh_peers: Vec<PeerId>,
    events: ServerEvents,
}

impl Server {
    /// Create a new Server listening on `link`
    pub fn new(config: ServerConfig, catalog: EquippableCatalog, link: Box<dyn Link>) -> Self {
        let socket = ServerSocket::new(config.socket.clone(), config.max_peers, link);
        Self::with_socket(config, catalog, Box::new(socket))
    }

    /// Create a new Server on a custom socket implementation
    pub fn with_socket(
        config: ServerConfig,
        catalog: EquippableCatalog,
        socket: Box<dyn Socket>,
    ) -> Self {
        Self {
            config,
            socket,
            simulation: Simulation::new(HostType::Host, catalog),
            peers: Vec::new(),
            fresh_peers: Vec::new(),
            events: ServerEvents::new(),
        }
    }

    // Lifecycle

    pub fn start(&mut self) -> Result<(), FragnetServerError> {
        self.socket.start()?;
        Ok(())
    }

    /// Disconnects every client with `reason` and stops listening
    pub fn stop(&mut self, reason: &str) {
        self.socket.stop(reason);
        // a stopped socket only hands back the disconnects it just produced
        let socket_events = self.socket.tick();
        self.drain_socket_events(socket_events);
    }

    pub fn status(&self) -> SocketStatus {
        self.socket.status()
    }

    pub fn set_status_observer(&mut self, observer: StatusObserver) {
        self.socket.set_status_observer(observer);
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    // Simulation

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Runs one server step: handles socket traffic, ticks the simulation and
    /// sends this tick's changes to every client.
    pub fn tick(&mut self) {
        let socket_events = self.socket.tick();
        self.drain_socket_events(socket_events);

        self.simulation.tick();
        self.send_replication();

        let entity_events = self.simulation.take_events();
        self.events.push_entity_events(entity_events);
    }

    pub fn take_events(&mut self) -> ServerEvents {
        mem::take(&mut self.events)
    }

    // Peers

    /// Connected peers, in connection order
    pub fn peers(&self) -> &[PeerId] {
        &self.peers
    }

    /// Drops a client. Its disconnection event arrives with the next tick.
    pub fn disconnect(&mut self, peer: PeerId, reason: &str) {
        self.socket.disconnect(peer, reason);
        self.peers.retain(|existing| *existing != peer);
        self.fresh_peers.retain(|existing| *existing != peer);
    }

    pub fn send_unaddressed(&mut self, payload: &[u8], address: SocketAddr) {
        self.socket.send_unaddressed(payload, address);
    }

    // Private

    fn drain_socket_events(&mut self, socket_events: Vec<SocketEvent>) {
        for event in socket_events {
            match event {
                SocketEvent::Connected(peer) => {
                    self.peers.push(peer);
                    self.fresh_peers.push(peer);
                    self.events.push_connection(peer);
                }
                SocketEvent::Disconnected { peer, reason } => {
                    self.peers.retain(|existing| *existing != peer);
                    self.fresh_peers.retain(|existing| *existing != peer);
                    self.events.push_disconnection(peer, reason);
                }
                SocketEvent::Packet { peer, payload } => {
                    self.events.push_error(FragnetServerError::UnexpectedData {
                        peer,
                        length: payload.len(),
                    });
                }
                SocketEvent::Unaddressed { address, payload } => {
                    self.events.push_unaddressed(address, payload);
                }
            }
        }
    }

    fn send_replication(&mut self) {
        let tick = self.simulation.current_tick();
        let changes = self.simulation.take_outgoing();

        let fresh = mem::take(&mut self.fresh_peers);
        if !fresh.is_empty() {
            let snapshot = self.simulation.snapshot();
            info!(
                "Sending snapshot of {} messages to {} new peers",
                snapshot.len(),
                fresh.len()
            );
            self.broadcast(tick, snapshot, fresh.clone());
        }

        if changes.is_empty() {
            return;
        }
        let established: Vec<PeerId> = self
            .peers
            .iter()
            .copied()
            .filter(|peer| !fresh.contains(peer))
            .collect();
        if established.is_empty() {
            return;
        }
        let messages = changes.into_messages();
        debug!(
            "Replicating {} messages to {} peers",
            messages.len(),
            established.len()
        );
        self.broadcast(tick, messages, established);
    }

    fn broadcast(&mut self, tick: Tick, messages: Vec<EntityMessage>, mut peers: Vec<PeerId>) {
        // no client is systematically first to hear about a tick
        fastrand::shuffle(&mut peers);
        for packet in ReplicationPacket::split(tick, messages) {
            self.socket.send(&peers, &packet.to_bytes());
        }
    }
}
