use fragnet_client::Client;
use fragnet_server::Server;

/// Ticks the server, then every client, so each client sees what the server
/// sent this tick.
pub fn tick_and_exchange(server: &mut Server, clients: &mut [&mut Client]) {
    server.tick();
    for client in clients.iter_mut() {
        client.tick();
    }
}

pub fn exchange_packets_n_times(server: &mut Server, clients: &mut [&mut Client], n: usize) {
    for _ in 0..n {
        tick_and_exchange(server, clients);
    }
}

/// Ticks until every client finished its handshake. Panics after a bounded
/// number of rounds.
pub fn connect(server: &mut Server, clients: &mut [&mut Client]) {
    for _ in 0..16 {
        if clients.iter().all(|client| client.is_connected()) {
            return;
        }
        tick_and_exchange(server, clients);
    }
    panic!("clients did not connect");
}
