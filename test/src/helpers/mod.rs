pub mod assertions;
pub mod packet_exchange;
pub mod test_catalog;
pub mod test_client;
pub mod test_server;

pub use assertions::assert_converged;
pub use packet_exchange::{connect, exchange_packets_n_times, tick_and_exchange};
pub use test_catalog::{test_catalog, KNIFE, PISTOL, RIFLE, SHOTGUN};
pub use test_client::test_client;
pub use test_server::test_server;
