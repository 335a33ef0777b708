//! # Fragnet Client
//! Connects to a fragnet server and mirrors the entities it replicates into
//! a local simulation.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

pub mod transport;
pub mod shared {
    pub use fragnet_shared::{
        EntityEvent, EntityId, EntityType, EquippableCatalog, EquippableData, PacketChannel,
        PeerId, Simulation, Slot, SocketConfig, SocketStatus,
    };
    cfg_if! {
        if #[cfg(feature = "transport_udp")] {
            pub use fragnet_shared::UdpLink;
        }
    }
}

mod client;
mod error;
mod events;

pub use client::{Client, ClientConfig};
pub use error::FragnetClientError;
pub use events::ClientEvents;
