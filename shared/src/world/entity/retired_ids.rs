use std::collections::{HashSet, VecDeque};

use crate::types::{EntityId, Tick};

/// How long a deleted id is remembered, in simulation ticks. Long enough for
/// anything still in flight for the entity to arrive and be refused.
pub const RETIRED_ID_TTL: Tick = 60 * 60;

/// Ids of deleted entities, forgotten once they are older than the ttl.
pub struct RetiredIds {
    ids: HashSet<EntityId>,
    ttls: VecDeque<(Tick, EntityId)>,
    ttl: Tick,
}

impl RetiredIds {
    pub fn new() -> Self {
        Self::with_ttl(RETIRED_ID_TTL)
    }

    pub fn with_ttl(ttl: Tick) -> Self {
        Self {
            ids: HashSet::new(),
            ttls: VecDeque::new(),
            ttl,
        }
    }

    pub fn insert(&mut self, id: EntityId, now: Tick) {
        if self.ids.insert(id) {
            self.ttls.push_back((now, id));
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn expire(&mut self, now: Tick) {
        while let Some((retired_at, id)) = self.ttls.front().copied() {
            if now.saturating_sub(retired_at) < self.ttl {
                break;
            }
            self.ttls.pop_front();
            self.ids.remove(&id);
        }
    }
}

impl Default for RetiredIds {
    fn default() -> Self {
        Self::new()
    }
}
