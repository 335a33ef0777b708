/// PROPERTY-BASED TESTS: host/client convergence
///
/// Random sequences of host-side world changes, replicated over an in-memory
/// link, leave the client with the same entities, phases and property values.
use proptest::prelude::*;

use fragnet_shared::{
    equippable, human, slots, EntityId, EntityType, PropertyValue, Simulation, Vec3, ORIGIN,
};
use fragnet_test::{
    assert_converged, connect, exchange_packets_n_times, test_client, test_server,
    tick_and_exchange, LocalLinkPair, KNIFE, PISTOL, RIFLE, SHOTGUN,
};

const ITEM_NAMES: [&str; 4] = [RIFLE, SHOTGUN, PISTOL, KNIFE];

#[derive(Clone, Debug)]
enum Op {
    SpawnHuman,
    SpawnItem { name: usize },
    PickUp { item: usize, holder: usize },
    Drop { item: usize },
    Move { holder: usize, x: i8 },
    Run { holder: usize, z: i8 },
    DeleteItem { item: usize },
    DeleteHuman { holder: usize },
    Exchange,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::SpawnHuman),
        3 => (0..ITEM_NAMES.len()).prop_map(|name| Op::SpawnItem { name }),
        4 => (any::<usize>(), any::<usize>()).prop_map(|(item, holder)| Op::PickUp { item, holder }),
        2 => any::<usize>().prop_map(|item| Op::Drop { item }),
        2 => (any::<usize>(), any::<i8>()).prop_map(|(holder, x)| Op::Move { holder, x }),
        1 => (any::<usize>(), any::<i8>()).prop_map(|(holder, z)| Op::Run { holder, z }),
        1 => any::<usize>().prop_map(|item| Op::DeleteItem { item }),
        1 => any::<usize>().prop_map(|holder| Op::DeleteHuman { holder }),
        3 => Just(Op::Exchange),
    ]
}

fn pick(ids: &[EntityId], index: usize) -> Option<EntityId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()])
    }
}

#[derive(Default)]
struct Spawned {
    humans: Vec<EntityId>,
    items: Vec<EntityId>,
}

impl Spawned {
    // Errors are expected for ops on deleted entities or loose items
    fn run(&mut self, sim: &mut Simulation, op: &Op) {
        match *op {
            Op::SpawnHuman => {
                if let Ok(id) = sim.spawn(EntityType::Human) {
                    self.humans.push(id);
                }
            }
            Op::SpawnItem { name } => {
                if let Ok(id) = sim.spawn(EntityType::Equippable) {
                    let _ = equippable::set_item_name(sim, id, ITEM_NAMES[name]);
                    self.items.push(id);
                }
            }
            Op::PickUp { item, holder } => {
                if let (Some(item), Some(holder)) =
                    (pick(&self.items, item), pick(&self.humans, holder))
                {
                    let _ = equippable::set_human_id(sim, item, Some(holder));
                }
            }
            Op::Drop { item } => {
                if let Some(item) = pick(&self.items, item) {
                    let _ = slots::drop(sim, item);
                }
            }
            Op::Move { holder, x } => {
                if let Some(holder) = pick(&self.humans, holder) {
                    let origin = Vec3::new(f32::from(x), 1.0, 0.0);
                    let _ = sim.apply(holder, ORIGIN, PropertyValue::Vector(origin));
                }
            }
            Op::Run { holder, z } => {
                if let Some(holder) = pick(&self.humans, holder) {
                    let _ = human::set_velocity(sim, holder, Vec3::new(0.0, 0.0, f32::from(z)));
                }
            }
            Op::DeleteItem { item } => {
                if let Some(item) = pick(&self.items, item) {
                    sim.delete(item);
                }
            }
            Op::DeleteHuman { holder } => {
                if let Some(holder) = pick(&self.humans, holder) {
                    sim.delete(holder);
                }
            }
            Op::Exchange => {}
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_client_mirrors_host(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let _ = env_logger::builder().is_test(true).try_init();

        let pair = LocalLinkPair::new();
        let mut server = test_server(pair.server_link());
        let mut client = test_client(pair.client_link(0), pair.server_addr());
        connect(&mut server, &mut [&mut client]);

        let mut spawned = Spawned::default();
        for op in &ops {
            spawned.run(server.simulation_mut(), op);
            if matches!(op, Op::Exchange) {
                tick_and_exchange(&mut server, &mut [&mut client]);
            }
        }
        exchange_packets_n_times(&mut server, &mut [&mut client], 2);

        assert_converged(server.simulation(), client.simulation());
    }
}
