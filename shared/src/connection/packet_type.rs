// The kind of datagram, written in front of every payload

use naia_serde::{BitReader, BitWriter, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

use crate::messages::error::DecodeError;

#[derive(Copy, Debug, Clone, Eq, PartialEq)]
pub enum PacketType {
    // Replicated entity state
    Data,
    // Sent when a side has nothing else to send, so it does not time out
    Heartbeat,
    // Sent by the client until the server accepts it
    ConnectRequest,
    // Server's answer to a ConnectRequest
    ConnectAccept,
    // Server is full
    ConnectReject,
    // Either side is closing the connection. Payload is the reason
    Disconnect,
}

// Most packets should be Data, so it gets a single bit
impl Serde for PacketType {
    fn ser(&self, writer: &mut dyn naia_serde::BitWrite) {
        let is_data = *self == PacketType::Data;
        is_data.ser(writer);

        if is_data {
            return;
        }

        let index: u8 = match self {
            PacketType::Data | PacketType::Heartbeat => 0,
            PacketType::ConnectRequest => 1,
            PacketType::ConnectAccept => 2,
            PacketType::ConnectReject => 3,
            PacketType::Disconnect => 4,
        };

        UnsignedInteger::<3>::new(index).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let is_data = bool::de(reader)?;
        if is_data {
            return Ok(PacketType::Data);
        }

        let index = UnsignedInteger::<3>::de(reader)?.to::<u8>();
        match index {
            0 => Ok(PacketType::Heartbeat),
            1 => Ok(PacketType::ConnectRequest),
            2 => Ok(PacketType::ConnectAccept),
            3 => Ok(PacketType::ConnectReject),
            4 => Ok(PacketType::Disconnect),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        let mut output = 0;

        let is_data = *self == PacketType::Data;
        output += is_data.bit_length();

        if is_data {
            return output;
        }

        output += <UnsignedInteger<3> as ConstBitLength>::const_bit_length();

        output
    }
}

impl PacketType {
    /// Builds a datagram: one header byte followed by `payload`.
    pub fn frame(self, payload: &[u8]) -> Box<[u8]> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        let header = writer.to_bytes();

        let mut datagram = Vec::with_capacity(header.len() + payload.len());
        datagram.extend_from_slice(&header);
        datagram.extend_from_slice(payload);
        datagram.into_boxed_slice()
    }

    /// Splits a datagram into its type and payload.
    pub fn unframe(datagram: &[u8]) -> Result<(PacketType, &[u8]), DecodeError> {
        let Some((header, payload)) = datagram.split_first() else {
            return Err(DecodeError::Truncated { length: 0 });
        };
        let header = [*header];
        let mut reader = BitReader::new(&header);
        let packet_type = PacketType::de(&mut reader).map_err(|_| DecodeError::Malformed {
            what: "packet type",
        })?;
        Ok((packet_type, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::PacketType;
    use crate::messages::error::DecodeError;

    #[test]
    fn frame_then_unframe() {
        for packet_type in [
            PacketType::Data,
            PacketType::Heartbeat,
            PacketType::ConnectRequest,
            PacketType::ConnectAccept,
            PacketType::ConnectReject,
            PacketType::Disconnect,
        ] {
            let datagram = packet_type.frame(b"payload");
            let (decoded, payload) = PacketType::unframe(&datagram).unwrap();
            assert_eq!(decoded, packet_type);
            assert_eq!(payload, b"payload");
        }
    }

    #[test]
    fn empty_datagram_is_truncated() {
        assert_eq!(
            PacketType::unframe(&[]),
            Err(DecodeError::Truncated { length: 0 })
        );
    }

    #[test]
    fn unknown_type_is_malformed() {
        // not data, index 7
        let datagram = [0b0000_1110u8];
        assert!(PacketType::unframe(&datagram).is_err());
    }
}
