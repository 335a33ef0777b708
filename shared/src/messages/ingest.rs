use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::{messages::entity_message::EntityMessage, types::Tick};

/// Decoded messages waiting to be applied, tagged with the host tick they
/// were sent on. Links may push from any thread, the simulation drains once
/// per tick.
pub struct IngestQueue {
    sender: Sender<(Tick, EntityMessage)>,
    receiver: Receiver<(Tick, EntityMessage)>,
}

impl IngestQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// A handle that can feed the queue from elsewhere.
    pub fn sender(&self) -> Sender<(Tick, EntityMessage)> {
        self.sender.clone()
    }

    pub fn push(&self, tick: Tick, message: EntityMessage) {
        // the queue owns a receiver, so this cannot be disconnected
        let _ = self.sender.send((tick, message));
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Everything queued so far, in arrival order.
    pub fn drain(&self) -> Vec<(Tick, EntityMessage)> {
        self.receiver.try_iter().collect()
    }
}

impl Default for IngestQueue {
    fn default() -> Self {
        Self::new()
    }
}
