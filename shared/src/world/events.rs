use crate::{
    types::EntityId,
    world::{
        entity::entity::EntityType,
        equip::{catalog::Slot, slots::DropPlacement},
    },
};

// Lifecycle and gameplay notifications, drained with `Simulation::take_events`
#[derive(Clone, Debug, PartialEq)]
pub enum EntityEvent {
    Spawned {
        entity: EntityId,
        entity_type: EntityType,
    },
    Activated {
        entity: EntityId,
    },
    /// Catalog data was found for an item's name.
    RepresentationCreated {
        entity: EntityId,
        item_name: String,
        slot: Slot,
    },
    Equipped {
        item: EntityId,
        holder: EntityId,
        slot: Slot,
    },
    Unequipped {
        item: EntityId,
        holder: Option<EntityId>,
    },
    Dropped {
        item: EntityId,
        holder: EntityId,
        placement: DropPlacement,
    },
    Deleted {
        entity: EntityId,
    },
    /// A client received an item name its catalog does not know.
    DataError {
        entity: EntityId,
        item_name: String,
    },
}

impl EntityEvent {
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Spawned { entity, .. } => *entity,
            Self::Activated { entity } => *entity,
            Self::RepresentationCreated { entity, .. } => *entity,
            Self::Equipped { item, .. } => *item,
            Self::Unequipped { item, .. } => *item,
            Self::Dropped { item, .. } => *item,
            Self::Deleted { entity } => *entity,
            Self::DataError { entity, .. } => *entity,
        }
    }
}
