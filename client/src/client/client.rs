use std::{collections::HashMap, mem, net::SocketAddr, time::Instant};

use log::{debug, warn};

use fragnet_shared::{
    ApplyError, DirectoryError, EntityId, EntityMessage, EquippableCatalog, HostType,
    IngestQueue, Link, PropertyIndex, PropertyUpdate, ReplicationPacket, Simulation, Socket,
    SocketEvent, SocketStatus, StatusObserver, Tick,
};

use crate::{
    client::{client_config::ClientConfig, update_waitlist::UpdateWaitlist},
    events::ClientEvents,
    transport::ClientSocket,
    FragnetClientError,
};

/// Mirror of the host's world. Decodes replication packets from the server
/// and applies them to a client [`Simulation`] once per tick.
pub struct Client {
    config: ClientConfig,
    socket: Box<dyn Socket>,
    simulation: Simulation,
    incoming: IngestQueue,
    // newest host tick applied per property, older updates are stale
    last_ticks: HashMap<(EntityId, PropertyIndex), Tick>,
    waitlist: UpdateWaitlist,
    events: ClientEvents,
}

impl Client {
    /// Create a new Client that reaches the server through `link`
    pub fn new(config: ClientConfig, catalog: EquippableCatalog, link: Box<dyn Link>) -> Self {
        let socket = ClientSocket::new(config.socket.clone(), config.server_addr, link);
        Self::with_socket(config, catalog, Box::new(socket))
    }

    /// Create a new Client on a custom socket implementation
    pub fn with_socket(
        config: ClientConfig,
        catalog: EquippableCatalog,
        socket: Box<dyn Socket>,
    ) -> Self {
        let waitlist = UpdateWaitlist::new(config.waitlist_ttl);
        Self {
            config,
            socket,
            simulation: Simulation::new(HostType::Client, catalog),
            incoming: IngestQueue::new(),
            last_ticks: HashMap::new(),
            waitlist,
            events: ClientEvents::new(),
        }
    }

    // Lifecycle

    /// Opens the link and starts the handshake with the server
    pub fn start(&mut self) -> Result<(), FragnetClientError> {
        self.socket.start()?;
        Ok(())
    }

    pub fn stop(&mut self, reason: &str) {
        self.socket.stop(reason);
        let socket_events = self.socket.tick();
        self.drain_socket_events(socket_events);
    }

    pub fn status(&self) -> SocketStatus {
        self.socket.status()
    }

    pub fn is_connected(&self) -> bool {
        self.socket.status() == SocketStatus::Connected
    }

    pub fn set_status_observer(&mut self, observer: StatusObserver) {
        self.socket.set_status_observer(observer);
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn send_unaddressed(&mut self, payload: &[u8], address: SocketAddr) {
        self.socket.send_unaddressed(payload, address);
    }

    // Simulation

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Whether updates for `entity` arrived before its spawn and are still
    /// waiting for it
    pub fn is_waiting_for(&self, entity: &EntityId) -> bool {
        self.waitlist.contains(entity)
    }

    /// Handles socket traffic, applies everything the server sent since the
    /// last tick and ticks the local simulation.
    pub fn tick(&mut self) {
        let socket_events = self.socket.tick();
        self.drain_socket_events(socket_events);

        self.waitlist.expire(Instant::now());
        for (tick, message) in self.incoming.drain() {
            self.receive_message(tick, message);
        }

        self.simulation.tick();

        let entity_events = self.simulation.take_events();
        self.events.push_entity_events(entity_events);
    }

    pub fn take_events(&mut self) -> ClientEvents {
        mem::take(&mut self.events)
    }

    // Private

    fn drain_socket_events(&mut self, socket_events: Vec<SocketEvent>) {
        for event in socket_events {
            match event {
                SocketEvent::Connected(_) => self.events.push_connection(),
                SocketEvent::Disconnected { reason, .. } => {
                    self.events.push_disconnection(reason);
                }
                SocketEvent::Packet { payload, .. } => self.receive_packet(&payload),
                SocketEvent::Unaddressed { address, payload } => {
                    self.events.push_unaddressed(address, payload);
                }
            }
        }
    }

    fn receive_packet(&mut self, payload: &[u8]) {
        let packet = match ReplicationPacket::from_bytes(payload) {
            Ok(packet) => packet,
            Err(error) => {
                warn!("Dropping replication packet: {}", error);
                self.events.push_error(error.into());
                return;
            }
        };
        for message in packet.messages {
            self.incoming.push(packet.tick, message);
        }
    }

    fn receive_message(&mut self, tick: Tick, message: EntityMessage) {
        match message {
            EntityMessage::Update(update) => self.receive_update(tick, update),
            EntityMessage::Spawn { entity, .. } => {
                self.apply_message(message);
                if self.simulation.entity(entity).is_ok() {
                    for (waiting_tick, update) in self.waitlist.take(&entity) {
                        self.receive_update(waiting_tick, update);
                    }
                }
            }
            EntityMessage::Despawn { entity } => {
                self.waitlist.remove(&entity);
                self.last_ticks.retain(|(id, _), _| *id != entity);
                self.apply_message(message);
            }
        }
    }

    fn receive_update(&mut self, tick: Tick, update: PropertyUpdate) {
        let key = (update.entity, update.property);
        if let Some(last) = self.last_ticks.get(&key) {
            if tick < *last {
                debug!("Dropping stale update for {} from tick {}", update.entity, tick);
                return;
            }
        }
        if let Err(ApplyError::EntityNotFound { entity }) = self.simulation.entity(update.entity) {
            debug!("Holding update for {} until it is spawned", entity);
            self.waitlist.queue(tick, update, Instant::now());
            return;
        }

        let result = self
            .simulation
            .apply(update.entity, update.property, update.value);
        // an unknown item name is still stored
        if matches!(result, Ok(()) | Err(ApplyError::MissingEquippable { .. })) {
            self.last_ticks.insert(key, tick);
        }
        if let Err(error) = result {
            self.report(key.0, error);
        }
    }

    fn apply_message(&mut self, message: EntityMessage) {
        let entity = message.entity();
        if let Err(error) = self.simulation.receive_message(message) {
            self.report(entity, error);
        }
    }

    fn report(&mut self, entity: EntityId, error: ApplyError) {
        match &error {
            ApplyError::EntityDeleted { .. }
            | ApplyError::Directory(DirectoryError::Retired { .. }) => {
                debug!("Ignoring message for retired entity {}", entity);
            }
            // already reported as a DataError event
            ApplyError::MissingEquippable { .. } => {}
            _ => warn!("Failed to apply message for {}: {}", entity, error),
        }
        self.events.push_error(error.into());
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use fragnet_shared::{
        ChannelLink, EntityId, EntityMessage, EntityType, EquippableCatalog, Link, PacketChannel,
        PacketReceiver, PacketSender, PacketType, PropertyUpdate, PropertyValue,
        ReplicationPacket, Vec3, ORIGIN,
    };

    use crate::{Client, ClientConfig};

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    struct RawServer {
        _link: ChannelLink,
        sender: Box<dyn PacketSender>,
        _receiver: Box<dyn PacketReceiver>,
    }

    impl RawServer {
        fn send(&self, packet: ReplicationPacket) {
            self.sender
                .send(&addr(2), &PacketType::Data.frame(&packet.to_bytes()))
                .unwrap();
        }
    }

    fn connected_client() -> (Client, RawServer, PacketChannel) {
        let _ = env_logger::builder().is_test(true).try_init();

        let channel = PacketChannel::new();
        let mut link = channel.link(addr(1));
        let (sender, receiver) = link.open().unwrap();
        let server = RawServer {
            _link: link,
            sender,
            _receiver: receiver,
        };

        let config = ClientConfig {
            server_addr: addr(1),
            ..ClientConfig::default()
        };
        let mut client = Client::new(
            config,
            EquippableCatalog::default(),
            Box::new(channel.link(addr(2))),
        );
        client.start().unwrap();
        server
            .sender
            .send(&addr(2), &PacketType::ConnectAccept.frame(&1u64.to_le_bytes()))
            .unwrap();
        client.tick();
        assert!(client.take_events().take_connected());
        (client, server, channel)
    }

    fn origin_update(entity: EntityId, x: f32) -> EntityMessage {
        EntityMessage::Update(PropertyUpdate {
            entity,
            property: ORIGIN,
            value: PropertyValue::Vector(Vec3::new(x, 0.0, 0.0)),
        })
    }

    #[test]
    fn spawn_and_update_are_applied() {
        let (mut client, server, _channel) = connected_client();
        let id = EntityId::new(1);

        server.send(ReplicationPacket::new(
            1,
            vec![
                EntityMessage::Spawn {
                    entity: id,
                    entity_type: EntityType::Human,
                },
                origin_update(id, 3.0),
            ],
        ));
        client.tick();

        let entity = client.simulation().entity(id).unwrap();
        assert_eq!(entity.origin().x, 3.0);
    }

    #[test]
    fn stale_update_is_dropped() {
        let (mut client, server, _channel) = connected_client();
        let id = EntityId::new(1);

        server.send(ReplicationPacket::new(
            5,
            vec![
                EntityMessage::Spawn {
                    entity: id,
                    entity_type: EntityType::Human,
                },
                origin_update(id, 5.0),
            ],
        ));
        server.send(ReplicationPacket::new(4, vec![origin_update(id, 4.0)]));
        client.tick();

        assert_eq!(client.simulation().entity(id).unwrap().origin().x, 5.0);
    }

    #[test]
    fn update_ahead_of_its_spawn_is_held() {
        let (mut client, server, _channel) = connected_client();
        let id = EntityId::new(1);

        server.send(ReplicationPacket::new(2, vec![origin_update(id, 7.0)]));
        client.tick();
        assert!(client.simulation().entity(id).is_err());
        assert!(client.is_waiting_for(&id));

        server.send(ReplicationPacket::new(
            1,
            vec![EntityMessage::Spawn {
                entity: id,
                entity_type: EntityType::Human,
            }],
        ));
        client.tick();

        assert_eq!(client.simulation().entity(id).unwrap().origin().x, 7.0);
        assert!(!client.is_waiting_for(&id));
        assert!(client.take_events().take_errors().is_empty());
    }

    #[test]
    fn despawn_ahead_of_its_spawn_wins() {
        let (mut client, server, _channel) = connected_client();
        let id = EntityId::new(1);

        server.send(ReplicationPacket::new(2, vec![EntityMessage::Despawn { entity: id }]));
        server.send(ReplicationPacket::new(
            1,
            vec![
                EntityMessage::Spawn {
                    entity: id,
                    entity_type: EntityType::Human,
                },
                origin_update(id, 1.0),
            ],
        ));
        client.tick();

        assert!(client.simulation().entity(id).is_err());
        assert!(client.simulation().directory().is_empty());
    }

    #[test]
    fn update_after_a_long_quiet_stretch_is_applied() {
        let (mut client, server, _channel) = connected_client();
        let id = EntityId::new(1);

        server.send(ReplicationPacket::new(
            10,
            vec![
                EntityMessage::Spawn {
                    entity: id,
                    entity_type: EntityType::Human,
                },
                origin_update(id, 1.0),
            ],
        ));
        client.tick();
        server.send(ReplicationPacket::new(10 + 40_000, vec![origin_update(id, 2.0)]));
        client.tick();

        assert_eq!(client.simulation().entity(id).unwrap().origin().x, 2.0);
    }

    #[test]
    fn garbage_data_is_reported() {
        let (mut client, server, _channel) = connected_client();
        server
            .sender
            .send(&addr(2), &PacketType::Data.frame(&[0xff]))
            .unwrap();
        client.tick();

        assert_eq!(client.take_events().take_errors().len(), 1);
    }
}
