use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    time::{Duration, Instant},
};

use log::info;

use fragnet_shared::{EntityId, PropertyIndex, PropertyUpdate, PropertyValue, Tick};

/// Property updates that overtook the spawn of their entity. Only the newest
/// value per property is kept, and an entity whose spawn never shows up is
/// forgotten after the ttl.
pub struct UpdateWaitlist {
    waiting: HashMap<EntityId, BTreeMap<PropertyIndex, (Tick, PropertyValue)>>,
    ttls: VecDeque<(Instant, EntityId)>,
    ttl: Duration,
}

impl UpdateWaitlist {
    pub fn new(ttl: Duration) -> Self {
        Self {
            waiting: HashMap::new(),
            ttls: VecDeque::new(),
            ttl,
        }
    }

    /// Holds `update` until its entity is spawned. Returns false when a
    /// newer value for the same property is already waiting.
    pub fn queue(&mut self, tick: Tick, update: PropertyUpdate, now: Instant) -> bool {
        if !self.waiting.contains_key(&update.entity) {
            self.ttls.push_back((now, update.entity));
        }
        let properties = self.waiting.entry(update.entity).or_default();
        if let Some((waiting_tick, _)) = properties.get(&update.property) {
            if *waiting_tick > tick {
                return false;
            }
        }
        properties.insert(update.property, (tick, update.value));
        true
    }

    /// Everything waiting for `entity`, in property order.
    pub fn take(&mut self, entity: &EntityId) -> Vec<(Tick, PropertyUpdate)> {
        let Some(properties) = self.waiting.remove(entity) else {
            return Vec::new();
        };
        self.ttls.retain(|(_, id)| id != entity);
        properties
            .into_iter()
            .map(|(property, (tick, value))| {
                (
                    tick,
                    PropertyUpdate {
                        entity: *entity,
                        property,
                        value,
                    },
                )
            })
            .collect()
    }

    pub fn remove(&mut self, entity: &EntityId) {
        if self.waiting.remove(entity).is_some() {
            self.ttls.retain(|(_, id)| id != entity);
        }
    }

    pub fn contains(&self, entity: &EntityId) -> bool {
        self.waiting.contains_key(entity)
    }

    pub fn expire(&mut self, now: Instant) {
        loop {
            let Some((queued_at, _)) = self.ttls.front() else {
                break;
            };
            if now.saturating_duration_since(*queued_at) < self.ttl {
                break;
            }
            let Some((_, entity)) = self.ttls.pop_front() else {
                break;
            };
            if let Some(properties) = self.waiting.remove(&entity) {
                info!(
                    "Dropping {} updates for {}, its spawn never arrived",
                    properties.len(),
                    entity
                );
            }
        }
    }
}
