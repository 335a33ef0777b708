use thiserror::Error as ThisError;

use crate::types::EntityId;

/// Errors that can occur while registering entities with the EntityDirectory
#[derive(Debug, Clone, ThisError, PartialEq, Eq)]
pub enum DirectoryError {
    /// Entity id is already registered; the existing entity is left in place
    #[error("Entity {entity} is already registered. Ids must be unique while alive")]
    AlreadyRegistered {
        entity: EntityId,
    },

    /// Entity id was deleted and cannot be registered again
    #[error("Entity {entity} was deleted and its id is retired")]
    Retired {
        entity: EntityId,
    },

    /// Entity id allocation ran out of ids
    #[error("Entity id space exhausted")]
    IdsExhausted,
}
