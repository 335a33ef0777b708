use std::{
    collections::BTreeSet,
    mem,
};

use log::{debug, info};

use crate::{
    messages::entity_message::{EntityMessage, OutgoingChanges, PropertyUpdate},
    types::{EntityId, HostType, Tick},
    world::{
        component::{
            error::PropertyError,
            property::PropertyIndex,
            property_value::PropertyValue,
            registry::{PropertyRegistry, MAX_PROPERTIES},
        },
        entity::{
            entity::{Entity, EntityPhase, EntityType, EntityVariant},
            entity_directory::EntityDirectory,
            error::DirectoryError,
            id_generator::EntityIdGenerator,
            retired_ids::RetiredIds,
        },
        equip::{catalog::EquippableCatalog, equippable, equippable::Equippable, human, human::Human},
        error::ApplyError,
        events::EntityEvent,
    },
};

/// One side of the replicated world: the host's authoritative copy or a
/// client's mirror of it.
///
/// Owns every entity, the property tables and the item catalog. Property
/// writes from game code and from the network both go through
/// [`Simulation::apply`].
pub struct Simulation {
    host_type: HostType,
    registry: PropertyRegistry,
    catalog: EquippableCatalog,
    directory: EntityDirectory,
    id_generator: EntityIdGenerator,
    retired: RetiredIds,
    events: Vec<EntityEvent>,
    pending_spawns: Vec<(EntityId, EntityType)>,
    dirty: BTreeSet<(EntityId, PropertyIndex)>,
    pending_despawns: Vec<EntityId>,
    tick: Tick,
}

impl Simulation {
    pub fn new(host_type: HostType, catalog: EquippableCatalog) -> Self {
        Self::with_registry(host_type, catalog, PropertyRegistry::default())
    }

    pub fn with_registry(
        host_type: HostType,
        catalog: EquippableCatalog,
        registry: PropertyRegistry,
    ) -> Self {
        Self {
            host_type,
            registry,
            catalog,
            directory: EntityDirectory::new(),
            id_generator: EntityIdGenerator::new(),
            retired: RetiredIds::new(),
            events: Vec::new(),
            pending_spawns: Vec::new(),
            dirty: BTreeSet::new(),
            pending_despawns: Vec::new(),
            tick: 0,
        }
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn is_host(&self) -> bool {
        self.host_type.is_host()
    }

    pub fn directory(&self) -> &EntityDirectory {
        &self.directory
    }

    pub fn catalog(&self) -> &EquippableCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    // Lifecycle

    /// Creates a new entity with a freshly allocated id. Host only.
    pub fn spawn(&mut self, entity_type: EntityType) -> Result<EntityId, ApplyError> {
        let id = self.reserve_id()?;
        self.spawn_with_id(id, entity_type)?;
        Ok(id)
    }

    /// Allocates an id without registering anything under it. Host only.
    pub fn reserve_id(&mut self) -> Result<EntityId, ApplyError> {
        if !self.is_host() {
            return Err(ApplyError::HostOnly {
                operation: "reserve_id",
            });
        }
        Ok(self.id_generator.generate()?)
    }

    /// Registers an entity under an id chosen elsewhere, e.g. one received
    /// from the host.
    pub fn spawn_with_id(&mut self, id: EntityId, entity_type: EntityType) -> Result<(), ApplyError> {
        if self.retired.contains(&id) {
            return Err(DirectoryError::Retired { entity: id }.into());
        }
        if !self.registry.is_registered(entity_type) {
            return Err(PropertyError::TypeNotRegistered { entity_type }.into());
        }

        self.directory.register(Entity::new(id, entity_type))?;
        self.id_generator.skip_past(id);
        if self.is_host() {
            self.pending_spawns.push((id, entity_type));
        }
        debug!("Spawned {:?} {}", entity_type, id);
        self.events.push(EntityEvent::Spawned {
            entity: id,
            entity_type,
        });
        self.refresh_phase(id);
        Ok(())
    }

    /// Deletes an entity. Deleting an unknown or already deleted id does
    /// nothing. Returns whether anything was deleted.
    pub fn delete(&mut self, id: EntityId) -> bool {
        let entity_type = match self.directory.find_mut(&id) {
            Some(entity) if entity.phase() != EntityPhase::Deleted => {
                entity.set_phase(EntityPhase::Deleted);
                entity.entity_type()
            }
            _ => return false,
        };

        match entity_type {
            EntityType::Human => human::on_delete(self, id),
            EntityType::Equippable => equippable::on_delete(self, id),
        }

        self.directory.unregister(&id);
        self.retired.insert(id, self.tick);
        self.dirty.retain(|(entity, _)| *entity != id);
        if self.is_host() {
            let before = self.pending_spawns.len();
            self.pending_spawns.retain(|(entity, _)| *entity != id);
            // never sent, so nothing to take back
            if before == self.pending_spawns.len() {
                self.pending_despawns.push(id);
            }
        }
        debug!("Deleted {}", id);
        self.events.push(EntityEvent::Deleted { entity: id });
        true
    }

    /// Whether `id` belonged to an entity deleted within the last
    /// [`RETIRED_ID_TTL`](crate::RETIRED_ID_TTL) ticks.
    pub fn is_retired(&self, id: &EntityId) -> bool {
        self.retired.contains(id)
    }

    /// Advances one simulation step. Active entities tick in id order.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.retired.expire(self.tick);
        for id in self.directory.ids() {
            let entity_type = match self.directory.find(&id) {
                Some(entity) if entity.is_active() => entity.entity_type(),
                _ => continue,
            };
            match entity_type {
                EntityType::Equippable => equippable::tick(self, id),
                EntityType::Human => {}
            }
        }
    }

    pub fn take_events(&mut self) -> Vec<EntityEvent> {
        mem::take(&mut self.events)
    }

    // Properties

    /// Applies a value to a property through its descriptor. This is the
    /// only write path for replicated state.
    pub fn apply(
        &mut self,
        id: EntityId,
        index: PropertyIndex,
        value: PropertyValue,
    ) -> Result<(), ApplyError> {
        let entity_type = self.entity(id)?.entity_type();
        let descriptor = *self.registry.descriptor(entity_type, index)?;
        if value.kind() != descriptor.kind() {
            return Err(PropertyError::TypeMismatch {
                property: descriptor.name(),
                expected: descriptor.kind(),
                actual: value.kind(),
            }
            .into());
        }

        let result = (descriptor.setter())(self, id, value);
        self.refresh_phase(id);
        result
    }

    pub fn apply_named(
        &mut self,
        id: EntityId,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), ApplyError> {
        let entity_type = self.entity(id)?.entity_type();
        let index = self.registry.index_of(entity_type, name)?;
        self.apply(id, index, value)
    }

    /// Current value of a property.
    pub fn read(&self, id: EntityId, index: PropertyIndex) -> Result<PropertyValue, ApplyError> {
        let entity = self.entity(id)?;
        let entity_type = entity.entity_type();
        let descriptor = self.registry.descriptor(entity_type, index)?;
        descriptor
            .get(entity)
            .ok_or_else(|| PropertyError::UnknownProperty { entity_type, index }.into())
    }

    /// Records that a property now holds a value. On the host the property
    /// is also queued for replication.
    pub(crate) fn touch(&mut self, id: EntityId, index: PropertyIndex) {
        let Some(entity) = self.directory.find_mut(&id) else {
            return;
        };
        if entity.phase() == EntityPhase::Deleted || usize::from(index) >= MAX_PROPERTIES {
            return;
        }
        entity.mark_received(index);
        if self.host_type.is_host() {
            self.dirty.insert((id, index));
        }
    }

    pub(crate) fn push_event(&mut self, event: EntityEvent) {
        self.events.push(event);
    }

    // Replication

    /// Everything that changed since the last call, in the order it has to
    /// be sent: spawns, then property values, then despawns.
    pub fn take_outgoing(&mut self) -> OutgoingChanges {
        let spawns = mem::take(&mut self.pending_spawns);
        let despawns = mem::take(&mut self.pending_despawns);
        let dirty = mem::take(&mut self.dirty);

        let mut updates = Vec::with_capacity(dirty.len());
        for (id, index) in dirty {
            let Some(entity) = self.directory.find(&id) else {
                continue;
            };
            let Ok(descriptor) = self.registry.descriptor(entity.entity_type(), index) else {
                continue;
            };
            if let Some(value) = descriptor.get(entity) {
                updates.push(PropertyUpdate {
                    entity: id,
                    property: index,
                    value,
                });
            }
        }

        OutgoingChanges {
            spawns,
            updates,
            despawns,
        }
    }

    /// Full state for a peer that has seen nothing yet: a spawn for every
    /// entity followed by each property that holds a value.
    pub fn snapshot(&self) -> Vec<EntityMessage> {
        let mut spawns = Vec::new();
        let mut updates = Vec::new();
        for id in self.directory.ids() {
            let Some(entity) = self.directory.find(&id) else {
                continue;
            };
            let entity_type = entity.entity_type();
            spawns.push(EntityMessage::Spawn {
                entity: id,
                entity_type,
            });
            for (index, descriptor) in self.registry.descriptors(entity_type).iter().enumerate() {
                let index = index as PropertyIndex;
                if !entity.has_received(index) {
                    continue;
                }
                if let Some(value) = descriptor.get(entity) {
                    updates.push(EntityMessage::Update(PropertyUpdate {
                        entity: id,
                        property: index,
                        value,
                    }));
                }
            }
        }
        spawns.extend(updates);
        spawns
    }

    /// Applies one message received from the host.
    pub fn receive_message(&mut self, message: EntityMessage) -> Result<(), ApplyError> {
        match message {
            EntityMessage::Spawn {
                entity,
                entity_type,
            } => {
                if let Some(existing) = self.directory.find(&entity) {
                    if existing.entity_type() == entity_type {
                        // snapshots can repeat a spawn that already arrived
                        return Ok(());
                    }
                }
                self.spawn_with_id(entity, entity_type)
            }
            EntityMessage::Despawn { entity } => {
                if !self.delete(entity) && !self.directory.contains(&entity) {
                    // overtook its spawn, which must not register later
                    info!("Despawn for unknown entity {}", entity);
                    self.retired.insert(entity, self.tick);
                }
                Ok(())
            }
            EntityMessage::Update(update) => {
                self.apply(update.entity, update.property, update.value)
            }
        }
    }

    // Lookup

    pub fn entity(&self, id: EntityId) -> Result<&Entity, ApplyError> {
        if self.retired.contains(&id) {
            return Err(ApplyError::EntityDeleted { entity: id });
        }
        self.directory
            .find(&id)
            .ok_or(ApplyError::EntityNotFound { entity: id })
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, ApplyError> {
        if self.retired.contains(&id) {
            return Err(ApplyError::EntityDeleted { entity: id });
        }
        self.directory
            .find_mut(&id)
            .ok_or(ApplyError::EntityNotFound { entity: id })
    }

    pub fn human(&self, id: EntityId) -> Result<&Human, ApplyError> {
        self.typed(id)
    }

    pub(crate) fn human_mut(&mut self, id: EntityId) -> Result<&mut Human, ApplyError> {
        self.typed_mut(id)
    }

    pub fn equippable(&self, id: EntityId) -> Result<&Equippable, ApplyError> {
        self.typed(id)
    }

    pub(crate) fn equippable_mut(&mut self, id: EntityId) -> Result<&mut Equippable, ApplyError> {
        self.typed_mut(id)
    }

    fn typed<T: EntityVariant>(&self, id: EntityId) -> Result<&T, ApplyError> {
        let entity = self.entity(id)?;
        T::from_kind(entity.kind()).ok_or(ApplyError::WrongEntityType {
            entity: id,
            expected: T::ENTITY_TYPE,
            actual: entity.entity_type(),
        })
    }

    fn typed_mut<T: EntityVariant>(&mut self, id: EntityId) -> Result<&mut T, ApplyError> {
        let entity = self.entity_mut(id)?;
        let actual = entity.entity_type();
        T::from_kind_mut(entity.kind_mut()).ok_or(ApplyError::WrongEntityType {
            entity: id,
            expected: T::ENTITY_TYPE,
            actual,
        })
    }

    fn refresh_phase(&mut self, id: EntityId) {
        let Some(entity) = self.directory.find_mut(&id) else {
            return;
        };
        if entity.phase() != EntityPhase::Spawning {
            return;
        }
        let required = self.registry.required_mask(entity.entity_type());
        if entity.received_mask() & required != required {
            return;
        }
        entity.set_phase(EntityPhase::Active);
        debug!("Activated {}", id);
        self.events.push(EntityEvent::Activated { entity: id });
    }
}
