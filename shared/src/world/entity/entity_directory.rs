use std::collections::HashMap;

use crate::{
    types::EntityId,
    world::entity::{
        entity::{Entity, EntityVariant},
        error::DirectoryError,
    },
};

/// Registry of live entities keyed by id.
pub struct EntityDirectory {
    entities: HashMap<EntityId, Entity>,
}

impl EntityDirectory {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
        }
    }

    /// Adds an entity under its own id. An id that is already present is a
    /// caller error and leaves the registered entity untouched.
    pub fn register(&mut self, entity: Entity) -> Result<(), DirectoryError> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(DirectoryError::AlreadyRegistered { entity: id });
        }
        self.entities.insert(id, entity);
        Ok(())
    }

    pub fn unregister(&mut self, id: &EntityId) -> Option<Entity> {
        self.entities.remove(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn find(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn find_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Finds an entity and narrows it to a concrete variant. Returns `None`
    /// when the id is unknown or belongs to a different variant.
    pub fn find_typed<T: EntityVariant>(&self, id: &EntityId) -> Option<&T> {
        self.entities
            .get(id)
            .and_then(|entity| T::from_kind(entity.kind()))
    }

    pub fn find_typed_mut<T: EntityVariant>(&mut self, id: &EntityId) -> Option<&mut T> {
        self.entities
            .get_mut(id)
            .and_then(|entity| T::from_kind_mut(entity.kind_mut()))
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for EntityDirectory {
    fn default() -> Self {
        Self::new()
    }
}
