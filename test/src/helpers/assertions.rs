use fragnet_shared::{PropertyIndex, Simulation};

/// Asserts that `client` mirrors every entity of `host` with identical
/// property values and phase.
pub fn assert_converged(host: &Simulation, client: &Simulation) {
    let host_ids = host.directory().ids();
    assert_eq!(host_ids, client.directory().ids(), "entity sets differ");

    for id in host_ids {
        let host_entity = host.entity(id).expect("listed entity");
        let client_entity = client.entity(id).expect("listed entity");
        assert_eq!(host_entity.entity_type(), client_entity.entity_type());
        assert_eq!(host_entity.phase(), client_entity.phase(), "phase of {}", id);

        let count = host.registry().descriptors(host_entity.entity_type()).len();
        for index in 0..count {
            let index = index as PropertyIndex;
            assert_eq!(
                host.read(id, index),
                client.read(id, index),
                "property {} of {}",
                index,
                id
            );
        }
    }
}
