mod server_socket;

pub use server_socket::ServerSocket;
