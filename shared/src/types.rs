use std::fmt;

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

/// Host simulation step. 32 bits wide so it does not wrap within a session
/// and ticks can be compared directly.
pub type Tick = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Host,
    Client,
}

impl HostType {
    pub fn invert(self) -> Self {
        match self {
            HostType::Host => HostType::Client,
            HostType::Client => HostType::Host,
        }
    }

    pub fn is_host(self) -> bool {
        self == HostType::Host
    }
}

/// Identifies a replicated entity. Ids are handed out by the host and are
/// never reused while the host is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Serde for EntityId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<7>::new(self.0).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value = UnsignedVariableInteger::<7>::de(reader)?.get();
        let value = u32::try_from(value).map_err(|_| SerdeErr)?;
        Ok(Self(value))
    }

    fn bit_length(&self) -> u32 {
        UnsignedVariableInteger::<7>::new(self.0).bit_length()
    }
}
