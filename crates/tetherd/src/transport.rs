//! Packet-oriented UDP transport.
//!
//! [`FrameSocket`] wraps a connected `tokio::net::UdpSocket` and speaks
//! [`Frame`]s. Receiving is bounded: a timeout, a wrong-sized datagram and an
//! undecodable datagram all come back as `None` — the protocol treats them
//! identically, and recovery is retransmission, never an error path.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time;
use zerocopy::AsBytes;

use tether_core::Frame;

pub struct FrameSocket {
    inner: UdpSocket,
}

impl FrameSocket {
    /// Bind `local_port` and fix the remote endpoint. Datagrams from other
    /// addresses are filtered by the OS from here on.
    pub async fn open(local_port: u16, peer: SocketAddr) -> io::Result<Self> {
        let inner = UdpSocket::bind(("0.0.0.0", local_port)).await?;
        inner.connect(peer).await?;
        Ok(Self { inner })
    }

    /// Fire-and-forget send of one frame.
    pub async fn send(&self, frame: &Frame) -> io::Result<()> {
        self.inner.send(frame.as_bytes()).await?;
        Ok(())
    }

    /// Wait up to `timeout` for one frame-sized datagram.
    pub async fn recv_timeout(&self, timeout: Duration) -> Option<Frame> {
        let mut buf = [0u8; 64];
        let len = match time::timeout(timeout, self.inner.recv(&mut buf)).await {
            Ok(Ok(len)) => len,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "recv failed");
                return None;
            }
            // Timed out — a valid outcome, not an error.
            Err(_) => return None,
        };

        match Frame::parse(&buf[..len]) {
            Ok(frame) => Some(frame),
            Err(e) => {
                tracing::trace!(len, error = %e, "undecodable datagram, ignoring");
                None
            }
        }
    }
}
