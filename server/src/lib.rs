//! # Fragnet Server
//! The authoritative host: owns the simulation, accepts client connections
//! and replicates entity properties to every connected client.

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

mod error;
mod events;
mod server;

pub use error::FragnetServerError;
pub use events::ServerEvents;
pub use server::{Server, ServerConfig};
