mod client;
mod client_config;
mod update_waitlist;

pub use client::Client;
pub use client_config::ClientConfig;
