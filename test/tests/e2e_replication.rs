use fragnet_client::Client;
use fragnet_server::Server;
use fragnet_shared::{
    equippable, human, slots, EntityEvent, EntityId, EntityPhase, EntityType, PropertyValue,
    Simulation, Slot, Vec3, ORIGIN,
};
use fragnet_test::{
    assert_converged, connect, exchange_packets_n_times, test_client, test_server,
    tick_and_exchange, LocalLinkPair, PISTOL, RIFLE, SHOTGUN,
};

fn setup(pair: &LocalLinkPair) -> (Server, Client) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = test_server(pair.server_link());
    let mut client = test_client(pair.client_link(0), pair.server_addr());
    connect(&mut server, &mut [&mut client]);
    (server, client)
}

fn spawn_item(sim: &mut Simulation, name: &str) -> EntityId {
    let item = sim.spawn(EntityType::Equippable).unwrap();
    equippable::set_item_name(sim, item, name).unwrap();
    item
}

#[test]
fn equipped_item_converges() {
    let pair = LocalLinkPair::new();
    let (mut server, mut client) = setup(&pair);

    let sim = server.simulation_mut();
    let holder = sim.spawn(EntityType::Human).unwrap();
    let rifle = spawn_item(sim, RIFLE);
    equippable::set_human_id(sim, rifle, Some(holder)).unwrap();

    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_converged(server.simulation(), client.simulation());
    let mirrored = client.simulation().equippable(rifle).unwrap();
    assert_eq!(mirrored.human(), Some(holder));
    assert!(mirrored.is_active());
    assert!(client
        .take_events()
        .take_entity_events()
        .contains(&EntityEvent::Equipped {
            item: rifle,
            holder,
            slot: Slot(0),
        }));
}

#[test]
fn holder_arriving_later_resolves_on_both_sides() {
    let pair = LocalLinkPair::new();
    let (mut server, mut client) = setup(&pair);

    let sim = server.simulation_mut();
    let rifle = spawn_item(sim, RIFLE);
    let holder = sim.reserve_id().unwrap();
    equippable::set_human_id(sim, rifle, Some(holder)).unwrap();
    tick_and_exchange(&mut server, &mut [&mut client]);

    let mirrored = client.simulation().equippable(rifle).unwrap();
    assert_eq!(mirrored.human_id(), Some(holder));
    assert_eq!(mirrored.human(), None);

    let sim = server.simulation_mut();
    sim.spawn_with_id(holder, EntityType::Human).unwrap();
    equippable::set_equipped(sim, rifle, true).unwrap();
    exchange_packets_n_times(&mut server, &mut [&mut client], 2);

    assert_converged(server.simulation(), client.simulation());
    assert_eq!(
        slots::active_in_slot(client.simulation(), holder, Slot(0)),
        Some(rifle)
    );
    assert!(client.simulation().equippable(rifle).unwrap().is_active());
}

#[test]
fn displacement_and_promotion_replicate() {
    let pair = LocalLinkPair::new();
    let (mut server, mut client) = setup(&pair);

    let sim = server.simulation_mut();
    let holder = sim.spawn(EntityType::Human).unwrap();
    let rifle = spawn_item(sim, RIFLE);
    let pistol = spawn_item(sim, PISTOL);
    equippable::set_human_id(sim, rifle, Some(holder)).unwrap();
    equippable::set_human_id(sim, pistol, Some(holder)).unwrap();
    tick_and_exchange(&mut server, &mut [&mut client]);
    assert_converged(server.simulation(), client.simulation());

    // same slot as the rifle, which gets dropped
    let sim = server.simulation_mut();
    let shotgun = spawn_item(sim, SHOTGUN);
    equippable::set_human_id(sim, shotgun, Some(holder)).unwrap();
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_converged(server.simulation(), client.simulation());
    let client_sim = client.simulation();
    assert_eq!(client_sim.equippable(rifle).unwrap().human(), None);
    assert_eq!(client_sim.equippable(shotgun).unwrap().human(), Some(holder));
    let held = client_sim.human(holder).unwrap().equippables();
    assert!(held.contains(&pistol));
    assert!(!held.contains(&rifle));
}

#[test]
fn drop_places_item_in_front_of_holder() {
    let pair = LocalLinkPair::new();
    let (mut server, mut client) = setup(&pair);

    let sim = server.simulation_mut();
    let holder = sim.spawn(EntityType::Human).unwrap();
    sim.apply(holder, ORIGIN, PropertyValue::Vector(Vec3::new(10.0, 0.0, 5.0)))
        .unwrap();
    human::set_velocity(sim, holder, Vec3::new(0.0, 0.0, 3.0)).unwrap();
    let rifle = spawn_item(sim, RIFLE);
    equippable::set_human_id(sim, rifle, Some(holder)).unwrap();
    tick_and_exchange(&mut server, &mut [&mut client]);
    client.take_events();

    let placement = slots::drop(server.simulation_mut(), rifle).unwrap();
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_converged(server.simulation(), client.simulation());
    let client_sim = client.simulation();
    assert_eq!(client_sim.entity(rifle).unwrap().origin(), placement.origin);
    assert_eq!(client_sim.equippable(rifle).unwrap().human_id(), None);
    let dropped = client
        .take_events()
        .take_entity_events()
        .into_iter()
        .any(|event| matches!(event, EntityEvent::Dropped { item, .. } if item == rifle));
    assert!(dropped);
}

#[test]
fn drop_in_the_same_tick_as_a_move_keeps_the_host_pose() {
    let pair = LocalLinkPair::new();
    let (mut server, mut client) = setup(&pair);

    // the item has the lower id, so its values reach the client first
    let sim = server.simulation_mut();
    let rifle = spawn_item(sim, RIFLE);
    let holder = sim.spawn(EntityType::Human).unwrap();
    equippable::set_human_id(sim, rifle, Some(holder)).unwrap();
    tick_and_exchange(&mut server, &mut [&mut client]);

    let sim = server.simulation_mut();
    sim.apply(holder, ORIGIN, PropertyValue::Vector(Vec3::new(-4.0, 2.0, 8.0)))
        .unwrap();
    let placement = slots::drop(sim, rifle).unwrap();
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_eq!(
        client.simulation().entity(rifle).unwrap().origin(),
        placement.origin
    );
    assert_converged(server.simulation(), client.simulation());
}

#[test]
fn deleted_entity_is_retired_on_client() {
    let pair = LocalLinkPair::new();
    let (mut server, mut client) = setup(&pair);

    let rifle = spawn_item(server.simulation_mut(), RIFLE);
    tick_and_exchange(&mut server, &mut [&mut client]);
    assert!(client.simulation().entity(rifle).is_ok());

    assert!(server.simulation_mut().delete(rifle));
    assert!(!server.simulation_mut().delete(rifle));
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert!(client.simulation().is_retired(&rifle));
    assert_converged(server.simulation(), client.simulation());
}

#[test]
fn unknown_item_on_host_is_never_replicated() {
    let pair = LocalLinkPair::new();
    let (mut server, mut client) = setup(&pair);

    let sim = server.simulation_mut();
    let item = sim.spawn(EntityType::Equippable).unwrap();
    assert!(equippable::set_item_name(sim, item, "Railgun").is_err());
    assert!(sim.is_retired(&item));

    tick_and_exchange(&mut server, &mut [&mut client]);
    assert!(client.simulation().entity(item).is_err());
    assert!(client.take_events().take_errors().is_empty());
}

#[test]
fn late_joiner_receives_snapshot() {
    let pair = LocalLinkPair::new();
    let (mut server, mut early) = setup(&pair);

    let sim = server.simulation_mut();
    let holder = sim.spawn(EntityType::Human).unwrap();
    let rifle = spawn_item(sim, RIFLE);
    let knife = spawn_item(sim, fragnet_test::KNIFE);
    equippable::set_human_id(sim, rifle, Some(holder)).unwrap();
    equippable::set_human_id(sim, knife, Some(holder)).unwrap();
    exchange_packets_n_times(&mut server, &mut [&mut early], 3);

    let mut late = test_client(pair.client_link(1), pair.server_addr());
    connect(&mut server, &mut [&mut early, &mut late]);
    tick_and_exchange(&mut server, &mut [&mut early, &mut late]);

    assert_converged(server.simulation(), early.simulation());
    assert_converged(server.simulation(), late.simulation());
    assert_eq!(
        late.simulation().entity(rifle).unwrap().phase(),
        EntityPhase::Active
    );
    assert_eq!(server.peers().len(), 2);
}

#[test]
fn random_stream_follows_host() {
    let pair = LocalLinkPair::new();
    let (mut server, mut client) = setup(&pair);

    let rifle = spawn_item(server.simulation_mut(), RIFLE);
    tick_and_exchange(&mut server, &mut [&mut client]);

    for _ in 0..5 {
        equippable::next_random(server.simulation_mut(), rifle).unwrap();
    }
    tick_and_exchange(&mut server, &mut [&mut client]);

    let host_next = equippable::next_random(server.simulation_mut(), rifle).unwrap();
    let client_next = equippable::next_random(client.simulation_mut(), rifle).unwrap();
    assert_eq!(host_next, client_next);
}
