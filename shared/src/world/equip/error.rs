use thiserror::Error;

use crate::types::EntityId;

/// Errors raised by the attachment/slot resolver. All of them mean the
/// calling domain code asked for something that cannot happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Item has no holder to detach from or drop from
    #[error("Item {item} has no holder")]
    NoHolder {
        item: EntityId,
    },

    /// Item's holder id does not resolve to a registered Human
    #[error("Holder {holder} of item {item} is not a registered Human")]
    HolderNotFound {
        item: EntityId,
        holder: EntityId,
    },

    /// Item is already attached to a different holder
    #[error("Item {item} is already held by {holder}")]
    AlreadyAttached {
        item: EntityId,
        holder: EntityId,
    },

    /// Item has no catalog data yet, so its slot is unknown
    #[error("Item {item} has no resolved catalog data, its slot is unknown")]
    MissingRepresentation {
        item: EntityId,
    },

    /// Entity is not an Equippable
    #[error("Entity {entity} is not an Equippable")]
    NotAnEquippable {
        entity: EntityId,
    },
}
