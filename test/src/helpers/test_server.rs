use fragnet_server::{Server, ServerConfig};
use fragnet_shared::Link;

use crate::helpers::test_catalog;

/// A started server on `link` with the test catalog
pub fn test_server(link: impl Link + 'static) -> Server {
    let mut server = Server::new(ServerConfig::default(), test_catalog(), Box::new(link));
    server.start().expect("server link should open");
    server
}
