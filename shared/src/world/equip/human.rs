use crate::{
    math::Vec3,
    types::EntityId,
    world::{
        component::{
            property::{PropertyDescriptor, PropertyIndex},
            property_value::{PropertyValue, ValueKind},
        },
        entity::entity::{Entity, EntityKind},
        equip::equippables::Equippables,
        error::ApplyError,
        simulation::Simulation,
    },
};

pub const VELOCITY: PropertyIndex = 2;

/// A player body that can hold items.
#[derive(Clone, Debug, Default)]
pub struct Human {
    velocity: Vec3,
    equippables: Equippables,
}

impl Human {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn equippables(&self) -> &Equippables {
        &self.equippables
    }

    pub(crate) fn equippables_mut(&mut self) -> &mut Equippables {
        &mut self.equippables
    }
}

pub(crate) fn descriptors() -> Vec<PropertyDescriptor> {
    vec![PropertyDescriptor::new(
        "Velocity",
        ValueKind::Vector,
        get_velocity,
        apply_velocity,
    )]
}

/// Authoritative helper for the Velocity property.
pub fn set_velocity(
    sim: &mut Simulation,
    human: EntityId,
    velocity: Vec3,
) -> Result<(), ApplyError> {
    sim.apply(human, VELOCITY, PropertyValue::Vector(velocity))
}

fn get_velocity(entity: &Entity) -> Option<PropertyValue> {
    match entity.kind() {
        EntityKind::Human(human) => Some(PropertyValue::Vector(human.velocity)),
        _ => None,
    }
}

fn apply_velocity(sim: &mut Simulation, id: EntityId, value: PropertyValue) -> Result<(), ApplyError> {
    let velocity = value.into_vector("Velocity")?;
    sim.human_mut(id)?.velocity = velocity;
    sim.touch(id, VELOCITY);
    Ok(())
}

/// Clears every held item's back-reference before the human goes away so no
/// item keeps pointing at a deleted holder.
pub(crate) fn on_delete(sim: &mut Simulation, id: EntityId) {
    let items = match sim.human(id) {
        Ok(human) => human.equippables.items().to_vec(),
        Err(_) => return,
    };
    for item in items {
        crate::world::equip::slots::orphan(sim, item, id);
    }
}
