use std::{mem, net::SocketAddr};

use fragnet_shared::{EntityEvent, PeerId};

use crate::FragnetServerError;

/// Everything the server observed since events were last taken.
pub struct ServerEvents {
    connections: Vec<PeerId>,
    disconnections: Vec<(PeerId, String)>,
    unaddressed: Vec<(SocketAddr, Box<[u8]>)>,
    entity_events: Vec<EntityEvent>,
    errors: Vec<FragnetServerError>,

    empty: bool,
}

impl ServerEvents {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            unaddressed: Vec::new(),
            entity_events: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn take_connections(&mut self) -> Vec<PeerId> {
        mem::take(&mut self.connections)
    }

    pub fn take_disconnections(&mut self) -> Vec<(PeerId, String)> {
        mem::take(&mut self.disconnections)
    }

    pub fn take_unaddressed(&mut self) -> Vec<(SocketAddr, Box<[u8]>)> {
        mem::take(&mut self.unaddressed)
    }

    pub fn take_entity_events(&mut self) -> Vec<EntityEvent> {
        mem::take(&mut self.entity_events)
    }

    pub fn take_errors(&mut self) -> Vec<FragnetServerError> {
        mem::take(&mut self.errors)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, peer: PeerId) {
        self.connections.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, peer: PeerId, reason: String) {
        self.disconnections.push((peer, reason));
        self.empty = false;
    }

    pub(crate) fn push_unaddressed(&mut self, address: SocketAddr, payload: Box<[u8]>) {
        self.unaddressed.push((address, payload));
        self.empty = false;
    }

    pub(crate) fn push_entity_events(&mut self, events: Vec<EntityEvent>) {
        if events.is_empty() {
            return;
        }
        self.entity_events.extend(events);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: FragnetServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

impl Default for ServerEvents {
    fn default() -> Self {
        Self::new()
    }
}
