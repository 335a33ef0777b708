use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, SignedVariableInteger, UnsignedInteger};

use crate::{math::Vec3, types::EntityId, world::component::error::PropertyError};

/// Longest text value that fits in a single property update.
pub const MAX_TEXT_BYTES: usize = 255;

/// The kind of value a replicated property holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Entity,
    Vector,
}

/// A replicated property value, as carried on the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Text(String),
    /// A reference to another entity. `None` means "no entity".
    Entity(Option<EntityId>),
    Vector(Vec3),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Bool(_) => ValueKind::Bool,
            PropertyValue::Int(_) => ValueKind::Int,
            PropertyValue::Float(_) => ValueKind::Float,
            PropertyValue::Text(_) => ValueKind::Text,
            PropertyValue::Entity(_) => ValueKind::Entity,
            PropertyValue::Vector(_) => ValueKind::Vector,
        }
    }

    pub fn into_bool(self, property: &'static str) -> Result<bool, PropertyError> {
        match self {
            PropertyValue::Bool(value) => Ok(value),
            other => Err(mismatch(property, ValueKind::Bool, &other)),
        }
    }

    pub fn into_int(self, property: &'static str) -> Result<i32, PropertyError> {
        match self {
            PropertyValue::Int(value) => Ok(value),
            other => Err(mismatch(property, ValueKind::Int, &other)),
        }
    }

    pub fn into_float(self, property: &'static str) -> Result<f32, PropertyError> {
        match self {
            PropertyValue::Float(value) => Ok(value),
            other => Err(mismatch(property, ValueKind::Float, &other)),
        }
    }

    pub fn into_text(self, property: &'static str) -> Result<String, PropertyError> {
        match self {
            PropertyValue::Text(value) => Ok(value),
            other => Err(mismatch(property, ValueKind::Text, &other)),
        }
    }

    pub fn into_entity(self, property: &'static str) -> Result<Option<EntityId>, PropertyError> {
        match self {
            PropertyValue::Entity(value) => Ok(value),
            other => Err(mismatch(property, ValueKind::Entity, &other)),
        }
    }

    pub fn into_vector(self, property: &'static str) -> Result<Vec3, PropertyError> {
        match self {
            PropertyValue::Vector(value) => Ok(value),
            other => Err(mismatch(property, ValueKind::Vector, &other)),
        }
    }

    fn tag(&self) -> u8 {
        match self {
            PropertyValue::Bool(_) => 0,
            PropertyValue::Int(_) => 1,
            PropertyValue::Float(_) => 2,
            PropertyValue::Text(_) => 3,
            PropertyValue::Entity(_) => 4,
            PropertyValue::Vector(_) => 5,
        }
    }
}

fn mismatch(property: &'static str, expected: ValueKind, actual: &PropertyValue) -> PropertyError {
    PropertyError::TypeMismatch {
        property,
        expected,
        actual: actual.kind(),
    }
}

impl Serde for PropertyValue {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<3>::new(self.tag()).ser(writer);
        match self {
            PropertyValue::Bool(value) => value.ser(writer),
            PropertyValue::Int(value) => SignedVariableInteger::<10>::new(*value).ser(writer),
            PropertyValue::Float(value) => value.to_bits().ser(writer),
            PropertyValue::Text(value) => {
                // setters reject longer text, truncate defensively at a char boundary
                let mut end = value.len().min(MAX_TEXT_BYTES);
                while !value.is_char_boundary(end) {
                    end -= 1;
                }
                let bytes = &value.as_bytes()[..end];
                UnsignedInteger::<8>::new(bytes.len() as u8).ser(writer);
                for byte in bytes {
                    byte.ser(writer);
                }
            }
            PropertyValue::Entity(value) => {
                value.is_some().ser(writer);
                if let Some(entity) = value {
                    entity.ser(writer);
                }
            }
            PropertyValue::Vector(value) => value.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag = UnsignedInteger::<3>::de(reader)?.to::<u8>();
        match tag {
            0 => Ok(PropertyValue::Bool(bool::de(reader)?)),
            1 => {
                let value = SignedVariableInteger::<10>::de(reader)?.get();
                let value = i32::try_from(value).map_err(|_| SerdeErr)?;
                Ok(PropertyValue::Int(value))
            }
            2 => Ok(PropertyValue::Float(f32::from_bits(u32::de(reader)?))),
            3 => {
                let length = UnsignedInteger::<8>::de(reader)?.to::<usize>();
                let mut bytes = Vec::with_capacity(length);
                for _ in 0..length {
                    bytes.push(u8::de(reader)?);
                }
                let text = String::from_utf8(bytes).map_err(|_| SerdeErr)?;
                Ok(PropertyValue::Text(text))
            }
            4 => {
                if bool::de(reader)? {
                    Ok(PropertyValue::Entity(Some(EntityId::de(reader)?)))
                } else {
                    Ok(PropertyValue::Entity(None))
                }
            }
            5 => Ok(PropertyValue::Vector(Vec3::de(reader)?)),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        let body = match self {
            PropertyValue::Bool(_) => 1,
            PropertyValue::Int(value) => SignedVariableInteger::<10>::new(*value).bit_length(),
            PropertyValue::Float(_) => 32,
            PropertyValue::Text(value) => 8 + 8 * value.len().min(MAX_TEXT_BYTES) as u32,
            PropertyValue::Entity(value) => 1 + value.map_or(0, |entity| entity.bit_length()),
            PropertyValue::Vector(value) => value.bit_length(),
        };
        3 + body
    }
}
