use fragnet_client::{Client, ClientConfig};
use fragnet_shared::{EntityType, PropertyValue, Vec3, ORIGIN};
use fragnet_test::{
    assert_converged, connect, exchange_packets_n_times, test_catalog, test_server,
    tick_and_exchange, LocalLinkPair, ReorderingLink,
};

#[test]
fn older_update_never_overwrites_newer() {
    let _ = env_logger::builder().is_test(true).try_init();

    let pair = LocalLinkPair::new();
    let mut server = test_server(pair.server_link());
    // the spawn goes through in order, later updates arrive in swapped pairs
    let link = ReorderingLink::new(pair.client_link(0), 2).skip_first(1);
    let config = ClientConfig {
        server_addr: pair.server_addr(),
        ..ClientConfig::default()
    };
    let mut client = Client::new(config, test_catalog(), Box::new(link));
    client.start().unwrap();
    connect(&mut server, &mut [&mut client]);

    let holder = server
        .simulation_mut()
        .spawn(EntityType::Human)
        .unwrap();
    tick_and_exchange(&mut server, &mut [&mut client]);
    assert!(client.simulation().entity(holder).is_ok());

    let mut last_seen = 0.0;
    for step in 1..=6 {
        let origin = Vec3::new(step as f32, 0.0, 0.0);
        server
            .simulation_mut()
            .apply(holder, ORIGIN, PropertyValue::Vector(origin))
            .unwrap();
        tick_and_exchange(&mut server, &mut [&mut client]);

        let seen = client.simulation().entity(holder).unwrap().origin().x;
        assert!(seen >= last_seen, "origin went back from {} to {}", last_seen, seen);
        last_seen = seen;
    }

    assert_eq!(last_seen, 6.0);
    assert_converged(server.simulation(), client.simulation());
    assert!(client.take_events().take_errors().is_empty());
}

#[test]
fn update_overtaking_its_spawn_still_lands() {
    let _ = env_logger::builder().is_test(true).try_init();

    let pair = LocalLinkPair::new();
    let mut server = test_server(pair.server_link());
    let link = ReorderingLink::new(pair.client_link(0), 2);
    let config = ClientConfig {
        server_addr: pair.server_addr(),
        ..ClientConfig::default()
    };
    let mut client = Client::new(config, test_catalog(), Box::new(link));
    client.start().unwrap();
    connect(&mut server, &mut [&mut client]);

    let holder = server
        .simulation_mut()
        .spawn(EntityType::Human)
        .unwrap();
    tick_and_exchange(&mut server, &mut [&mut client]);
    assert!(client.simulation().entity(holder).is_err());

    server
        .simulation_mut()
        .apply(
            holder,
            ORIGIN,
            PropertyValue::Vector(Vec3::new(7.0, 0.0, 0.0)),
        )
        .unwrap();
    exchange_packets_n_times(&mut server, &mut [&mut client], 10);

    assert_eq!(client.simulation().entity(holder).unwrap().origin().x, 7.0);
    assert_converged(server.simulation(), client.simulation());
    assert!(client.take_events().take_errors().is_empty());
}
