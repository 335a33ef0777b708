use std::fmt;

use crate::{
    types::EntityId,
    world::{
        component::property_value::{PropertyValue, ValueKind},
        entity::entity::Entity,
        error::ApplyError,
        simulation::Simulation,
    },
};

/// Position of a property within its entity type's descriptor list. This is
/// what travels on the wire instead of the property name.
pub type PropertyIndex = u8;

/// Reads the current value of a property from an entity. Returns `None` if
/// the entity is not of the type the descriptor belongs to.
pub type PropertyGetter = fn(&Entity) -> Option<PropertyValue>;

/// Stores a value and runs its side effects. The same setter runs for
/// authoritative writes on the host and for replicated writes on a client.
pub type PropertySetter = fn(&mut Simulation, EntityId, PropertyValue) -> Result<(), ApplyError>;

/// Declares one network-visible field of an entity type.
#[derive(Clone, Copy)]
pub struct PropertyDescriptor {
    name: &'static str,
    kind: ValueKind,
    required: bool,
    getter: PropertyGetter,
    setter: PropertySetter,
}

impl PropertyDescriptor {
    pub fn new(
        name: &'static str,
        kind: ValueKind,
        getter: PropertyGetter,
        setter: PropertySetter,
    ) -> Self {
        Self {
            name,
            kind,
            required: false,
            getter,
            setter,
        }
    }

    /// Marks the property as needed before the entity can become Active.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn get(&self, entity: &Entity) -> Option<PropertyValue> {
        (self.getter)(entity)
    }

    pub(crate) fn setter(&self) -> PropertySetter {
        self.setter
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .finish()
    }
}
