use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedInteger};

use crate::{
    types::EntityId,
    world::{
        component::{
            property::PropertyIndex, property_value::PropertyValue, registry::MAX_PROPERTIES,
        },
        entity::entity::EntityType,
    },
};

/// One replicated property value.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyUpdate {
    pub entity: EntityId,
    pub property: PropertyIndex,
    pub value: PropertyValue,
}

impl Serde for PropertyUpdate {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entity.ser(writer);
        UnsignedInteger::<5>::new(self.property).ser(writer);
        self.value.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let entity = EntityId::de(reader)?;
        let property = UnsignedInteger::<5>::de(reader)?.to::<PropertyIndex>();
        if usize::from(property) >= MAX_PROPERTIES {
            return Err(SerdeErr);
        }
        let value = PropertyValue::de(reader)?;
        Ok(Self {
            entity,
            property,
            value,
        })
    }

    fn bit_length(&self) -> u32 {
        self.entity.bit_length() + 5 + self.value.bit_length()
    }
}

/// Host to client replication message.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityMessage {
    Spawn {
        entity: EntityId,
        entity_type: EntityType,
    },
    Despawn {
        entity: EntityId,
    },
    Update(PropertyUpdate),
}

impl EntityMessage {
    pub fn entity(&self) -> EntityId {
        match self {
            EntityMessage::Spawn { entity, .. } => *entity,
            EntityMessage::Despawn { entity } => *entity,
            EntityMessage::Update(update) => update.entity,
        }
    }
}

impl Serde for EntityMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            EntityMessage::Spawn {
                entity,
                entity_type,
            } => {
                UnsignedInteger::<2>::new(0u8).ser(writer);
                entity.ser(writer);
                entity_type.ser(writer);
            }
            EntityMessage::Despawn { entity } => {
                UnsignedInteger::<2>::new(1u8).ser(writer);
                entity.ser(writer);
            }
            EntityMessage::Update(update) => {
                UnsignedInteger::<2>::new(2u8).ser(writer);
                update.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag = UnsignedInteger::<2>::de(reader)?.to::<u8>();
        match tag {
            0 => {
                let entity = EntityId::de(reader)?;
                let entity_type = EntityType::de(reader)?;
                Ok(EntityMessage::Spawn {
                    entity,
                    entity_type,
                })
            }
            1 => Ok(EntityMessage::Despawn {
                entity: EntityId::de(reader)?,
            }),
            2 => Ok(EntityMessage::Update(PropertyUpdate::de(reader)?)),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        2 + match self {
            EntityMessage::Spawn {
                entity,
                entity_type,
            } => entity.bit_length() + entity_type.bit_length(),
            EntityMessage::Despawn { entity } => entity.bit_length(),
            EntityMessage::Update(update) => update.bit_length(),
        }
    }
}

/// What a host simulation produced since it was last drained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutgoingChanges {
    pub spawns: Vec<(EntityId, EntityType)>,
    pub updates: Vec<PropertyUpdate>,
    pub despawns: Vec<EntityId>,
}

impl OutgoingChanges {
    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty() && self.updates.is_empty() && self.despawns.is_empty()
    }

    /// Spawns first so updates never reach a client before their entity,
    /// despawns last.
    pub fn into_messages(self) -> Vec<EntityMessage> {
        let mut messages =
            Vec::with_capacity(self.spawns.len() + self.updates.len() + self.despawns.len());
        messages.extend(
            self.spawns
                .into_iter()
                .map(|(entity, entity_type)| EntityMessage::Spawn {
                    entity,
                    entity_type,
                }),
        );
        messages.extend(self.updates.into_iter().map(EntityMessage::Update));
        messages.extend(
            self.despawns
                .into_iter()
                .map(|entity| EntityMessage::Despawn { entity }),
        );
        messages
    }
}
