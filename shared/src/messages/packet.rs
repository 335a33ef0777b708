use naia_serde::{BitReader, BitWriter, Serde, UnsignedVariableInteger, MTU_SIZE_BITS};

use crate::{
    messages::{entity_message::EntityMessage, error::DecodeError},
    types::Tick,
};

// frame header (8) + tick (32) + worst case message count
const HEADER_BITS: u32 = 8 + 32 + 32;

/// Payload of a `PacketType::Data` datagram: everything the host replicated
/// in one tick, or one MTU-sized part of it.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplicationPacket {
    pub tick: Tick,
    pub messages: Vec<EntityMessage>,
}

impl ReplicationPacket {
    pub fn new(tick: Tick, messages: Vec<EntityMessage>) -> Self {
        Self { tick, messages }
    }

    /// Splits one tick's messages into packets that each fit in a datagram.
    /// Message order is kept across the packets.
    pub fn split(tick: Tick, messages: Vec<EntityMessage>) -> Vec<ReplicationPacket> {
        let budget = MTU_SIZE_BITS - HEADER_BITS;
        let mut packets = Vec::new();
        let mut current = Vec::new();
        let mut used = 0;

        for message in messages {
            let bits = message.bit_length();
            if !current.is_empty() && used + bits > budget {
                packets.push(ReplicationPacket::new(tick, std::mem::take(&mut current)));
                used = 0;
            }
            used += bits;
            current.push(message);
        }
        if !current.is_empty() {
            packets.push(ReplicationPacket::new(tick, current));
        }
        packets
    }

    pub fn to_bytes(&self) -> Box<[u8]> {
        let mut writer = BitWriter::new();
        self.tick.ser(&mut writer);
        UnsignedVariableInteger::<7>::new(self.messages.len() as u64).ser(&mut writer);
        for message in &self.messages {
            message.ser(&mut writer);
        }
        writer.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        // tick plus the smallest message count
        if bytes.len() < 5 {
            return Err(DecodeError::Truncated {
                length: bytes.len(),
            });
        }
        let mut reader = BitReader::new(bytes);
        let tick = Tick::de(&mut reader).map_err(|_| DecodeError::Malformed { what: "tick" })?;
        let count = UnsignedVariableInteger::<7>::de(&mut reader)
            .ok()
            .and_then(|count| u64::try_from(count.get()).ok())
            .ok_or(DecodeError::Malformed {
                what: "message count",
            })?;

        // every message takes at least 2 bits, anything above is corrupt
        let max = (bytes.len() as u64) * 4;
        if count > max {
            return Err(DecodeError::TooManyMessages {
                count: u32::try_from(count).unwrap_or(u32::MAX),
                max: u32::try_from(max).unwrap_or(u32::MAX),
            });
        }

        let mut messages = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let message = EntityMessage::de(&mut reader)
                .map_err(|_| DecodeError::Malformed { what: "entity message" })?;
            messages.push(message);
        }
        Ok(Self { tick, messages })
    }
}
