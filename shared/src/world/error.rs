use thiserror::Error;

use crate::{
    types::EntityId,
    world::{
        component::error::PropertyError, entity::entity::EntityType,
        entity::error::DirectoryError, equip::error::SlotError,
    },
};

/// Errors returned when a property value, authoritative or replicated, is
/// applied to an entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyError {
    /// No entity is registered under this id
    #[error("Entity {entity} is not registered")]
    EntityNotFound {
        entity: EntityId,
    },

    /// Entity was deleted, late values for it are dropped
    #[error("Entity {entity} has been deleted")]
    EntityDeleted {
        entity: EntityId,
    },

    /// Entity exists but is of another type than the operation needs
    #[error("Entity {entity} is a {actual:?}, expected a {expected:?}")]
    WrongEntityType {
        entity: EntityId,
        expected: EntityType,
        actual: EntityType,
    },

    /// Operation can only run on the host
    #[error("{operation} can only be called on the host")]
    HostOnly {
        operation: &'static str,
    },

    /// Item name does not resolve to catalog data
    #[error("Missing Equippable: {name} (entity {entity})")]
    MissingEquippable {
        entity: EntityId,
        name: String,
    },

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
