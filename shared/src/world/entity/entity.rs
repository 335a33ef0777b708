use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedInteger};

use crate::{
    math::Vec3,
    types::EntityId,
    world::{
        component::{
            property::{PropertyDescriptor, PropertyIndex},
            property_value::{PropertyValue, ValueKind},
        },
        equip::{equippable::Equippable, human::Human},
        error::ApplyError,
        simulation::Simulation,
    },
};

pub const ORIGIN: PropertyIndex = 0;
pub const ANGLES: PropertyIndex = 1;

/// Which concrete entity an id refers to. Sent with every spawn so the
/// receiving side can build the right variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityType {
    Human,
    Equippable,
}

impl Serde for EntityType {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let index: u8 = match self {
            EntityType::Human => 0,
            EntityType::Equippable => 1,
        };
        UnsignedInteger::<4>::new(index).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<4>::de(reader)?.to::<u8>() {
            0 => Ok(EntityType::Human),
            1 => Ok(EntityType::Equippable),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        4
    }
}

/// Lifecycle of an entity. `Deleted` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityPhase {
    /// Registered, waiting for its required properties.
    Spawning,
    /// Ticked once per simulation step.
    Active,
    Deleted,
}

#[derive(Debug)]
pub enum EntityKind {
    Human(Human),
    Equippable(Equippable),
}

/// The unit of replication.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    phase: EntityPhase,
    origin: Vec3,
    angles: Vec3,
    received: u32,
    kind: EntityKind,
}

impl Entity {
    pub fn new(id: EntityId, entity_type: EntityType) -> Self {
        let kind = match entity_type {
            EntityType::Human => EntityKind::Human(Human::new()),
            EntityType::Equippable => EntityKind::Equippable(Equippable::new(id)),
        };
        Self {
            id,
            phase: EntityPhase::Spawning,
            origin: Vec3::ZERO,
            angles: Vec3::ZERO,
            received: 0,
            kind,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn phase(&self) -> EntityPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == EntityPhase::Active
    }

    pub fn entity_type(&self) -> EntityType {
        match self.kind {
            EntityKind::Human(_) => EntityType::Human,
            EntityKind::Equippable(_) => EntityType::Equippable,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn angles(&self) -> Vec3 {
        self.angles
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut EntityKind {
        &mut self.kind
    }

    /// Whether the property at `index` has been given a value yet.
    pub fn has_received(&self, index: PropertyIndex) -> bool {
        self.received & (1 << index) != 0
    }

    pub(crate) fn received_mask(&self) -> u32 {
        self.received
    }

    pub(crate) fn mark_received(&mut self, index: PropertyIndex) {
        self.received |= 1 << index;
    }

    pub(crate) fn set_phase(&mut self, phase: EntityPhase) {
        self.phase = phase;
    }

    pub(crate) fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub(crate) fn set_angles(&mut self, angles: Vec3) {
        self.angles = angles;
    }
}

/// Implemented by every concrete entity so the directory can hand out typed
/// references.
pub trait EntityVariant: Sized {
    const ENTITY_TYPE: EntityType;

    fn from_kind(kind: &EntityKind) -> Option<&Self>;
    fn from_kind_mut(kind: &mut EntityKind) -> Option<&mut Self>;
}

impl EntityVariant for Human {
    const ENTITY_TYPE: EntityType = EntityType::Human;

    fn from_kind(kind: &EntityKind) -> Option<&Self> {
        match kind {
            EntityKind::Human(human) => Some(human),
            _ => None,
        }
    }

    fn from_kind_mut(kind: &mut EntityKind) -> Option<&mut Self> {
        match kind {
            EntityKind::Human(human) => Some(human),
            _ => None,
        }
    }
}

impl EntityVariant for Equippable {
    const ENTITY_TYPE: EntityType = EntityType::Equippable;

    fn from_kind(kind: &EntityKind) -> Option<&Self> {
        match kind {
            EntityKind::Equippable(equippable) => Some(equippable),
            _ => None,
        }
    }

    fn from_kind_mut(kind: &mut EntityKind) -> Option<&mut Self> {
        match kind {
            EntityKind::Equippable(equippable) => Some(equippable),
            _ => None,
        }
    }
}

// Base properties, shared by every entity type

pub(crate) fn base_descriptors() -> Vec<PropertyDescriptor> {
    vec![
        PropertyDescriptor::new("Origin", ValueKind::Vector, get_origin, apply_origin),
        PropertyDescriptor::new("Angles", ValueKind::Vector, get_angles, apply_angles),
    ]
}

fn get_origin(entity: &Entity) -> Option<PropertyValue> {
    Some(PropertyValue::Vector(entity.origin))
}

fn get_angles(entity: &Entity) -> Option<PropertyValue> {
    Some(PropertyValue::Vector(entity.angles))
}

fn apply_origin(sim: &mut Simulation, id: EntityId, value: PropertyValue) -> Result<(), ApplyError> {
    let origin = value.into_vector("Origin")?;
    sim.entity_mut(id)?.set_origin(origin);
    sim.touch(id, ORIGIN);
    Ok(())
}

fn apply_angles(sim: &mut Simulation, id: EntityId, value: PropertyValue) -> Result<(), ApplyError> {
    let angles = value.into_vector("Angles")?;
    sim.entity_mut(id)?.set_angles(angles);
    sim.touch(id, ANGLES);
    Ok(())
}
