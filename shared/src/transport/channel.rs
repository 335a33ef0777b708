use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::warn;

use crate::transport::{
    error::{RecvError, SendError, TransportError},
    link::{Link, PacketReceiver, PacketSender},
};

type Datagram = (SocketAddr, Box<[u8]>);
type Routes = Arc<Mutex<HashMap<SocketAddr, Sender<Datagram>>>>;

/// In-process datagram network. Every link bound on the same channel can
/// reach every other one by address.
#[derive(Clone, Default)]
pub struct PacketChannel {
    routes: Routes,
}

impl PacketChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A link that will bind `address` on this channel when opened.
    pub fn link(&self, address: SocketAddr) -> ChannelLink {
        ChannelLink {
            routes: self.routes.clone(),
            address,
            bound: false,
        }
    }

    pub fn is_bound(&self, address: &SocketAddr) -> bool {
        self.routes
            .lock()
            .map(|routes| routes.contains_key(address))
            .unwrap_or(false)
    }
}

pub struct ChannelLink {
    routes: Routes,
    address: SocketAddr,
    bound: bool,
}

impl Link for ChannelLink {
    fn local_addr(&self) -> SocketAddr {
        self.address
    }

    fn open(&mut self) -> Result<(Box<dyn PacketSender>, Box<dyn PacketReceiver>), TransportError> {
        let (sender, receiver) = unbounded();
        {
            let mut routes = self.routes.lock().map_err(|_| TransportError::Closed)?;
            if routes.contains_key(&self.address) {
                return Err(TransportError::AddressInUse {
                    address: self.address,
                });
            }
            routes.insert(self.address, sender);
        }
        self.bound = true;

        let packet_sender = ChannelSender {
            routes: self.routes.clone(),
            source: self.address,
        };
        let packet_receiver = ChannelReceiver { receiver };
        Ok((Box::new(packet_sender), Box::new(packet_receiver)))
    }

    fn close(&mut self) {
        if !self.bound {
            return;
        }
        self.bound = false;
        match self.routes.lock() {
            Ok(mut routes) => {
                routes.remove(&self.address);
            }
            Err(_) => warn!("Packet channel poisoned while closing {}", self.address),
        }
    }
}

impl Drop for ChannelLink {
    fn drop(&mut self) {
        self.close();
    }
}

struct ChannelSender {
    routes: Routes,
    source: SocketAddr,
}

impl PacketSender for ChannelSender {
    fn send(&self, address: &SocketAddr, payload: &[u8]) -> Result<(), SendError> {
        let routes = self.routes.lock().map_err(|_| SendError)?;
        let route = routes.get(address).ok_or(SendError)?;
        route
            .send((self.source, payload.into()))
            .map_err(|_| SendError)
    }
}

struct ChannelReceiver {
    receiver: Receiver<Datagram>,
}

impl PacketReceiver for ChannelReceiver {
    fn receive(&mut self) -> Result<Option<(SocketAddr, Box<[u8]>)>, RecvError> {
        match self.receiver.try_recv() {
            Ok(datagram) => Ok(Some(datagram)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RecvError),
        }
    }
}
