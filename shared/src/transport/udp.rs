use std::{
    io::ErrorKind,
    net::{SocketAddr, UdpSocket},
};

use naia_serde::MTU_SIZE_BYTES;

use crate::transport::{
    error::{RecvError, SendError, TransportError},
    link::{Link, PacketReceiver, PacketSender},
};

/// Plain non-blocking UDP.
pub struct UdpLink {
    address: SocketAddr,
    socket: Option<UdpSocket>,
}

impl UdpLink {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            socket: None,
        }
    }
}

impl Link for UdpLink {
    fn local_addr(&self) -> SocketAddr {
        self.socket
            .as_ref()
            .and_then(|socket| socket.local_addr().ok())
            .unwrap_or(self.address)
    }

    fn open(&mut self) -> Result<(Box<dyn PacketSender>, Box<dyn PacketReceiver>), TransportError> {
        let bind_error = |error: std::io::Error| TransportError::Bind {
            address: self.address,
            reason: error.to_string(),
        };
        let socket = UdpSocket::bind(self.address).map_err(bind_error)?;
        socket.set_nonblocking(true).map_err(bind_error)?;
        let sender = socket.try_clone().map_err(bind_error)?;
        let receiver = socket.try_clone().map_err(bind_error)?;
        self.socket = Some(socket);

        Ok((
            Box::new(UdpSender { socket: sender }),
            Box::new(UdpReceiver {
                socket: receiver,
                buffer: vec![0; MTU_SIZE_BYTES + 1].into_boxed_slice(),
            }),
        ))
    }

    fn close(&mut self) {
        self.socket = None;
    }
}

struct UdpSender {
    socket: UdpSocket,
}

impl PacketSender for UdpSender {
    fn send(&self, address: &SocketAddr, payload: &[u8]) -> Result<(), SendError> {
        match self.socket.send_to(payload, address) {
            Ok(_) => Ok(()),
            // full OS buffer, same as a lost datagram
            Err(error) if error.kind() == ErrorKind::WouldBlock => Ok(()),
            Err(_) => Err(SendError),
        }
    }
}

struct UdpReceiver {
    socket: UdpSocket,
    buffer: Box<[u8]>,
}

impl PacketReceiver for UdpReceiver {
    fn receive(&mut self) -> Result<Option<(SocketAddr, Box<[u8]>)>, RecvError> {
        loop {
            match self.socket.recv_from(&mut self.buffer) {
                Ok((length, address)) => {
                    return Ok(Some((address, self.buffer[..length].into())));
                }
                Err(error) if error.kind() == ErrorKind::WouldBlock => return Ok(None),
                // ICMP unreachable from an earlier send to a closed port
                Err(error) if error.kind() == ErrorKind::ConnectionReset => continue,
                Err(_) => return Err(RecvError),
            }
        }
    }
}
