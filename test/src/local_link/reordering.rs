use std::{collections::VecDeque, net::SocketAddr};

use fragnet_shared::{Link, PacketReceiver, PacketSender, PacketType, RecvError, TransportError};

type Datagram = (SocketAddr, Box<[u8]>);

/// Wraps a link so that inbound data datagrams arrive out of order. Every
/// `batch` data datagrams are held back and released newest first. Control
/// datagrams pass straight through.
pub struct ReorderingLink<L: Link> {
    inner: L,
    batch: usize,
    skip: usize,
}

impl<L: Link> ReorderingLink<L> {
    pub fn new(inner: L, batch: usize) -> Self {
        Self {
            inner,
            batch: batch.max(1),
            skip: 0,
        }
    }

    /// Lets the first `count` data datagrams through in order.
    pub fn skip_first(mut self, count: usize) -> Self {
        self.skip = count;
        self
    }
}

impl<L: Link> Link for ReorderingLink<L> {
    fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr()
    }

    fn open(&mut self) -> Result<(Box<dyn PacketSender>, Box<dyn PacketReceiver>), TransportError> {
        let (sender, receiver) = self.inner.open()?;
        let receiver = ReorderingReceiver {
            inner: receiver,
            batch: self.batch,
            skip: self.skip,
            held: Vec::new(),
            ready: VecDeque::new(),
        };
        Ok((sender, Box::new(receiver)))
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

struct ReorderingReceiver {
    inner: Box<dyn PacketReceiver>,
    batch: usize,
    skip: usize,
    held: Vec<Datagram>,
    ready: VecDeque<Datagram>,
}

impl PacketReceiver for ReorderingReceiver {
    fn receive(&mut self) -> Result<Option<Datagram>, RecvError> {
        while let Some(datagram) = self.inner.receive()? {
            let is_data = matches!(PacketType::unframe(&datagram.1), Ok((PacketType::Data, _)));
            if !is_data || self.skip > 0 {
                if is_data {
                    self.skip -= 1;
                }
                self.ready.push_back(datagram);
                continue;
            }
            self.held.push(datagram);
            if self.held.len() >= self.batch {
                self.ready.extend(self.held.drain(..).rev());
            }
        }
        Ok(self.ready.pop_front())
    }
}
