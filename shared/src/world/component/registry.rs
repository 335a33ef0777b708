use std::collections::HashMap;

use crate::world::{
    component::{
        error::PropertyError,
        property::{PropertyDescriptor, PropertyIndex},
    },
    entity::entity::{self, EntityType},
    equip::{equippable, human},
};

/// Most properties a single entity type can declare.
pub const MAX_PROPERTIES: usize = 32;

struct TypeProperties {
    descriptors: Vec<PropertyDescriptor>,
    by_name: HashMap<&'static str, PropertyIndex>,
    required_mask: u32,
}

/// Per-entity-type table of replicated property descriptors, built once when
/// entity types are registered.
pub struct PropertyRegistry {
    types: HashMap<EntityType, TypeProperties>,
}

impl PropertyRegistry {
    /// An empty registry. Most callers want [`PropertyRegistry::default`],
    /// which already knows every built-in entity type.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Registers the full descriptor list of an entity type. The position of
    /// each descriptor becomes its wire index.
    pub fn register_type(
        &mut self,
        entity_type: EntityType,
        descriptors: Vec<PropertyDescriptor>,
    ) -> Result<(), PropertyError> {
        if self.types.contains_key(&entity_type) {
            return Err(PropertyError::TypeAlreadyRegistered { entity_type });
        }
        if descriptors.len() > MAX_PROPERTIES {
            return Err(PropertyError::TooManyProperties {
                entity_type,
                count: descriptors.len(),
                max: MAX_PROPERTIES,
            });
        }

        let mut by_name = HashMap::new();
        let mut required_mask = 0;
        for (index, descriptor) in descriptors.iter().enumerate() {
            if by_name.insert(descriptor.name(), index as PropertyIndex).is_some() {
                return Err(PropertyError::DuplicatePropertyName {
                    entity_type,
                    name: descriptor.name(),
                });
            }
            if descriptor.is_required() {
                required_mask |= 1 << index;
            }
        }

        self.types.insert(
            entity_type,
            TypeProperties {
                descriptors,
                by_name,
                required_mask,
            },
        );
        Ok(())
    }

    pub fn is_registered(&self, entity_type: EntityType) -> bool {
        self.types.contains_key(&entity_type)
    }

    pub fn descriptors(&self, entity_type: EntityType) -> &[PropertyDescriptor] {
        self.types
            .get(&entity_type)
            .map(|properties| properties.descriptors.as_slice())
            .unwrap_or(&[])
    }

    pub fn descriptor(
        &self,
        entity_type: EntityType,
        index: PropertyIndex,
    ) -> Result<&PropertyDescriptor, PropertyError> {
        let properties = self.type_properties(entity_type)?;
        properties
            .descriptors
            .get(index as usize)
            .ok_or(PropertyError::UnknownProperty { entity_type, index })
    }

    pub fn index_of(
        &self,
        entity_type: EntityType,
        name: &str,
    ) -> Result<PropertyIndex, PropertyError> {
        let properties = self.type_properties(entity_type)?;
        properties
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| PropertyError::UnknownPropertyName {
                entity_type,
                name: name.to_string(),
            })
    }

    /// Bitmask of the properties that must be applied before an entity of
    /// this type leaves the Spawning phase.
    pub fn required_mask(&self, entity_type: EntityType) -> u32 {
        self.types
            .get(&entity_type)
            .map_or(0, |properties| properties.required_mask)
    }

    fn type_properties(&self, entity_type: EntityType) -> Result<&TypeProperties, PropertyError> {
        self.types
            .get(&entity_type)
            .ok_or(PropertyError::TypeNotRegistered { entity_type })
    }
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        let built_in = [
            (EntityType::Human, human::descriptors()),
            (EntityType::Equippable, equippable::descriptors()),
        ];
        for (entity_type, kind_descriptors) in built_in {
            let mut descriptors = entity::base_descriptors();
            descriptors.extend(kind_descriptors);
            if let Err(error) = registry.register_type(entity_type, descriptors) {
                log::error!("Built-in entity type failed to register: {}", error);
            }
        }
        registry
    }
}
