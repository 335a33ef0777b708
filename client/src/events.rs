use std::{mem, net::SocketAddr};

use fragnet_shared::EntityEvent;

use crate::FragnetClientError;

/// Everything the client observed since events were last taken.
pub struct ClientEvents {
    connected: bool,
    disconnections: Vec<String>,
    unaddressed: Vec<(SocketAddr, Box<[u8]>)>,
    entity_events: Vec<EntityEvent>,
    errors: Vec<FragnetClientError>,

    empty: bool,
}

impl ClientEvents {
    pub(crate) fn new() -> Self {
        Self {
            connected: false,
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

    /// Whether the handshake with the server completed
    pub fn take_connected(&mut self) -> bool {
        mem::take(&mut self.connected)
    }

    /// Reasons the connection ended
    pub fn take_disconnections(&mut self) -> Vec<String> {
        mem::take(&mut self.disconnections)
    }

    pub fn take_unaddressed(&mut self) -> Vec<(SocketAddr, Box<[u8]>)> {
        mem::take(&mut self.unaddressed)
    }

    pub fn take_entity_events(&mut self) -> Vec<EntityEvent> {
        mem::take(&mut self.entity_events)
    }

    pub fn take_errors(&mut self) -> Vec<FragnetClientError> {
        mem::take(&mut self.errors)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self) {
        self.connected = true;
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, reason: String) {
        self.disconnections.push(reason);
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

    pub(crate) fn push_error(&mut self, error: FragnetClientError) {
        self.errors.push(error);
        self.empty = false;
    }
}

impl Default for ClientEvents {
    fn default() -> Self {
        Self::new()
    }
}
