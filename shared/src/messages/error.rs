use thiserror::Error;

/// Errors that can occur while decoding a datagram received from a peer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Datagram is shorter than its header
    #[error("Datagram of {length} bytes is too short to carry a header")]
    Truncated {
        length: usize,
    },

    /// Bit stream ended early or carried an unknown tag
    #[error("Malformed {what} in datagram. The payload is truncated or corrupt")]
    Malformed {
        what: &'static str,
    },

    /// Message count announced in the header exceeds what a datagram can hold
    #[error("Packet announces {count} messages, at most {max} fit in one datagram")]
    TooManyMessages {
        count: u32,
        max: u32,
    },
}
