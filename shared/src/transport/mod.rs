pub mod channel;
pub mod config;
pub mod error;
pub mod link;
pub mod peer;
pub mod socket;
pub mod status;

cfg_if! {
    if #[cfg(feature = "transport_udp")] {
        pub mod udp;
    } else {}
}
