//! # Fragnet Shared
//! Entity model, replication wire format and transport contract shared by
//! fragnet-server & fragnet-client.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use naia_serde::{
    BitReader, BitWrite, BitWriter, Serde, SerdeErr, MTU_SIZE_BITS, MTU_SIZE_BYTES,
};

mod connection;
mod math;
mod messages;
mod random;
mod transport;
mod types;
mod world;

pub use connection::packet_type::PacketType;
pub use math::Vec3;
pub use messages::{
    entity_message::{EntityMessage, OutgoingChanges, PropertyUpdate},
    error::DecodeError,
    ingest::IngestQueue,
    packet::ReplicationPacket,
};
pub use random::StateRandom;
pub use transport::{
    channel::{ChannelLink, PacketChannel},
    config::SocketConfig,
    error::{RecvError, SendError, SocketError, TransportError},
    link::{Link, PacketReceiver, PacketSender},
    peer::PeerLink,
    socket::{PeerId, Socket, SocketEvent},
    status::{SocketState, SocketStatus, StatusObserver},
};
cfg_if! {
    if #[cfg(feature = "transport_udp")] {
        pub use transport::udp::UdpLink;
    }
}
pub use types::{EntityId, HostType, Tick};
pub use world::{
    component::{
        error::PropertyError,
        property::{PropertyDescriptor, PropertyGetter, PropertyIndex, PropertySetter},
        property_value::{PropertyValue, ValueKind, MAX_TEXT_BYTES},
        registry::{PropertyRegistry, MAX_PROPERTIES},
    },
    entity::{
        entity::{Entity, EntityKind, EntityPhase, EntityType, EntityVariant, ANGLES, ORIGIN},
        entity_directory::EntityDirectory,
        error::DirectoryError,
        id_generator::EntityIdGenerator,
        retired_ids::{RetiredIds, RETIRED_ID_TTL},
    },
    equip::{
        catalog::{EquippableCatalog, EquippableData, Slot},
        equippable::{
            self, Equippable, EQUIPPED, HUMAN_ID, ITEM_NAME, RANDOM_ACCUMULATOR,
        },
        equippables::Equippables,
        error::SlotError,
        human::{self, Human, VELOCITY},
        slots::{self, DropPlacement},
    },
    error::ApplyError,
    events::EntityEvent,
    simulation::Simulation,
};
