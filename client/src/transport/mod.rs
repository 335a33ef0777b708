mod client_socket;

pub use client_socket::ClientSocket;
