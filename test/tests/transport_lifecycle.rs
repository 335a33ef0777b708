use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use fragnet_client::{Client, ClientConfig};
use fragnet_server::{Server, ServerConfig};
use fragnet_shared::{Link, PeerId, SocketConfig, SocketStatus};
use fragnet_test::{
    connect, test_catalog, test_client, test_server, tick_and_exchange, LocalLinkPair,
};

fn short_timeouts() -> SocketConfig {
    SocketConfig {
        disconnection_timeout: Duration::from_millis(50),
        heartbeat_interval: Duration::from_millis(10),
        ..SocketConfig::default()
    }
}

#[test]
fn handshake_assigns_peer_and_reports_both_sides() {
    let _ = env_logger::builder().is_test(true).try_init();
    let pair = LocalLinkPair::new();
    let mut server = test_server(pair.server_link());
    let mut client = test_client(pair.client_link(0), pair.server_addr());
    assert_eq!(client.status(), SocketStatus::Starting);

    connect(&mut server, &mut [&mut client]);

    assert_eq!(server.status(), SocketStatus::Listening);
    assert_eq!(client.status(), SocketStatus::Connected);
    assert_eq!(server.take_events().take_connections(), vec![PeerId(1)]);
    assert!(client.take_events().take_connected());
}

#[test]
fn observer_sees_every_transition_once() {
    let pair = LocalLinkPair::new();
    let mut server = Server::new(
        ServerConfig::default(),
        test_catalog(),
        Box::new(pair.server_link()),
    );
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    server.set_status_observer(Box::new(move |old, new| {
        sink.lock().unwrap().push((old, new));
    }));

    server.start().unwrap();
    server.stop("shutdown");
    server.stop("shutdown");

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (SocketStatus::Unstarted, SocketStatus::Starting),
            (SocketStatus::Starting, SocketStatus::Listening),
            (SocketStatus::Listening, SocketStatus::Stopping),
            (SocketStatus::Stopping, SocketStatus::Stopped),
        ]
    );
}

#[test]
fn server_disconnect_reaches_client() {
    let pair = LocalLinkPair::new();
    let mut server = test_server(pair.server_link());
    let mut client = test_client(pair.client_link(0), pair.server_addr());
    connect(&mut server, &mut [&mut client]);
    server.take_events();

    server.disconnect(PeerId(1), "kicked");
    assert!(server.peers().is_empty());
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_eq!(
        server.take_events().take_disconnections(),
        vec![(PeerId(1), "kicked".to_string())]
    );
    assert_eq!(
        client.take_events().take_disconnections(),
        vec!["kicked".to_string()]
    );
    assert_eq!(client.status(), SocketStatus::Stopped);
}

#[test]
fn client_stop_reaches_server() {
    let pair = LocalLinkPair::new();
    let mut server = test_server(pair.server_link());
    let mut client = test_client(pair.client_link(0), pair.server_addr());
    connect(&mut server, &mut [&mut client]);
    server.take_events();

    client.stop("quit");
    client.stop("quit");
    server.tick();

    assert_eq!(
        server.take_events().take_disconnections(),
        vec![(PeerId(1), "quit".to_string())]
    );
    assert_eq!(client.take_events().take_disconnections().len(), 1);
}

#[test]
fn server_stop_disconnects_everyone() {
    let pair = LocalLinkPair::new();
    let mut server = test_server(pair.server_link());
    let mut first = test_client(pair.client_link(0), pair.server_addr());
    let mut second = test_client(pair.client_link(1), pair.server_addr());
    connect(&mut server, &mut [&mut first, &mut second]);
    server.take_events();

    server.stop("shutdown");
    first.tick();
    second.tick();

    assert_eq!(server.take_events().take_disconnections().len(), 2);
    assert_eq!(first.status(), SocketStatus::Stopped);
    assert_eq!(second.status(), SocketStatus::Stopped);
    assert!(!pair.channel().is_bound(&pair.server_addr()));
}

#[test]
fn silent_client_times_out() {
    let pair = LocalLinkPair::new();
    let config = ServerConfig {
        socket: short_timeouts(),
        ..ServerConfig::default()
    };
    let mut server = Server::new(config, test_catalog(), Box::new(pair.server_link()));
    server.start().unwrap();

    let mut client = test_client(pair.client_link(0), pair.server_addr());
    connect(&mut server, &mut [&mut client]);
    server.take_events();

    // the client stops ticking, so it never answers heartbeats
    thread::sleep(Duration::from_millis(80));
    server.tick();

    assert_eq!(
        server.take_events().take_disconnections(),
        vec![(PeerId(1), "timed out".to_string())]
    );
}

#[test]
fn heartbeats_keep_an_idle_connection_alive() {
    let pair = LocalLinkPair::new();
    let server_config = ServerConfig {
        socket: short_timeouts(),
        ..ServerConfig::default()
    };
    let mut server = Server::new(server_config, test_catalog(), Box::new(pair.server_link()));
    server.start().unwrap();
    let client_config = ClientConfig {
        socket: short_timeouts(),
        server_addr: pair.server_addr(),
        ..ClientConfig::default()
    };
    let mut client = Client::new(client_config, test_catalog(), Box::new(pair.client_link(0)));
    client.start().unwrap();
    connect(&mut server, &mut [&mut client]);

    for _ in 0..10 {
        thread::sleep(Duration::from_millis(15));
        tick_and_exchange(&mut server, &mut [&mut client]);
    }

    assert!(client.is_connected());
    assert_eq!(server.peers(), &[PeerId(1)]);
}

#[test]
fn full_server_rejects_client() {
    let pair = LocalLinkPair::new();
    let config = ServerConfig {
        max_peers: 0,
        ..ServerConfig::default()
    };
    let mut server = Server::new(config, test_catalog(), Box::new(pair.server_link()));
    server.start().unwrap();
    let mut client = test_client(pair.client_link(0), pair.server_addr());

    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_eq!(client.status(), SocketStatus::Stopped);
    assert_eq!(
        client.take_events().take_disconnections(),
        vec!["connection rejected".to_string()]
    );
}

#[test]
fn unaddressed_traffic_is_surfaced() {
    let pair = LocalLinkPair::new();
    let mut server = test_server(pair.server_link());

    let mut stranger = pair.client_link(9);
    let (sender, mut receiver) = stranger.open().unwrap();
    sender.send(&pair.server_addr(), b"status?").unwrap();
    server.tick();

    let unaddressed = server.take_events().take_unaddressed();
    assert_eq!(unaddressed.len(), 1);
    assert_eq!(unaddressed[0].0, pair.client_addr(9));
    assert_eq!(&*unaddressed[0].1, b"status?");

    server.send_unaddressed(b"up", pair.client_addr(9));
    let (from, reply) = receiver.receive().unwrap().unwrap();
    assert_eq!(from, pair.server_addr());
    assert_eq!(&*reply, b"up");
}

#[test]
fn restart_after_stop() {
    let pair = LocalLinkPair::new();
    let mut server = test_server(pair.server_link());
    assert!(server.start().is_err());

    server.stop("restart");
    server.start().unwrap();
    assert_eq!(server.status(), SocketStatus::Listening);

    let mut client = test_client(pair.client_link(0), pair.server_addr());
    connect(&mut server, &mut [&mut client]);
}
