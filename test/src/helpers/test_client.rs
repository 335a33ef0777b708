use std::net::SocketAddr;

use fragnet_client::{Client, ClientConfig};
use fragnet_shared::Link;

use crate::helpers::test_catalog;

/// A started client on `link`, handshaking with `server_addr`
pub fn test_client(link: impl Link + 'static, server_addr: SocketAddr) -> Client {
    let config = ClientConfig {
        server_addr,
        ..ClientConfig::default()
    };
    let mut client = Client::new(config, test_catalog(), Box::new(link));
    client.start().expect("client link should open");
    client
}
