use thiserror::Error;

use crate::world::{component::property_value::ValueKind, entity::entity::EntityType};

/// Errors that can occur while registering or applying replicated properties
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Property index is not part of the entity type's registry
    #[error("Entity type {entity_type:?} has no property with index {index}")]
    UnknownProperty {
        entity_type: EntityType,
        index: u8,
    },

    /// Property name is not part of the entity type's registry
    #[error("Entity type {entity_type:?} has no property named '{name}'")]
    UnknownPropertyName {
        entity_type: EntityType,
        name: String,
    },

    /// Entity type was never registered with the PropertyRegistry
    #[error("Entity type {entity_type:?} not registered. Must call `register_type()` before replicating it")]
    TypeNotRegistered {
        entity_type: EntityType,
    },

    /// Entity type was registered twice
    #[error("Entity type {entity_type:?} is already registered")]
    TypeAlreadyRegistered {
        entity_type: EntityType,
    },

    /// Two descriptors of the same entity type share a name
    #[error("Entity type {entity_type:?} declares property '{name}' more than once")]
    DuplicatePropertyName {
        entity_type: EntityType,
        name: &'static str,
    },

    /// An entity type declares more properties than the received-mask can track
    #[error("Entity type {entity_type:?} declares {count} properties, at most {max} are supported")]
    TooManyProperties {
        entity_type: EntityType,
        count: usize,
        max: usize,
    },

    /// Value kind does not match the descriptor
    #[error("Property '{property}' expects a {expected:?} value, got {actual:?}")]
    TypeMismatch {
        property: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Value has the right kind but is outside what the property accepts
    #[error("Property '{property}' cannot hold value {value}")]
    OutOfRange {
        property: &'static str,
        value: i64,
    },

    /// Text value exceeds the wire limit
    #[error("Property '{property}' text is {length} bytes, at most {max} are allowed")]
    TextTooLong {
        property: &'static str,
        length: usize,
        max: usize,
    },
}
