//! DNS message transport
//!
//! [`DnsTransport`] is the seam between building/interpreting messages and
//! putting them on the wire, so the lookup logic can be tested without a
//! network.

use async_trait::async_trait;
use ddns_core::{Error, Result};
use hickory_proto::op::Message;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;

/// Receive timeout used when none is given (the classic DNS client default)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Largest response we accept over UDP
const MAX_RESPONSE_SIZE: usize = 4096;

/// Sends one query and returns the one response
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Exchange a single message with `server` (a `host:port` string)
    ///
    /// I/O failures are returned as [`Error::Network`].
    async fn exchange(&self, server: &str, query: &Message) -> Result<Message>;
}

/// Plain UDP transport
#[derive(Debug, Clone)]
pub struct UdpTransport {
    timeout: Duration,
}

impl UdpTransport {
    /// Create a transport with the given receive timeout
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The receive timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn exchange(&self, server: &str, query: &Message) -> Result<Message> {
        let addr = tokio::net::lookup_host(server).await?.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for resolver {}", server),
            )
        })?;

        let bind_addr: SocketAddr = if addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(addr).await?;

        let bytes = query
            .to_vec()
            .map_err(|e| Error::protocol(format!("Failed to encode query: {}", e)))?;
        socket.send(&bytes).await?;
        tracing::trace!("sent {} byte query to {}", bytes.len(), addr);

        let mut buf = vec![0u8; MAX_RESPONSE_SIZE];
        let len = tokio::time::timeout(self.timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no response from {} within {:?}", server, self.timeout),
                )
            })??;
        tracing::trace!("received {} byte response from {}", len, addr);

        Message::from_vec(&buf[..len])
            .map_err(|e| Error::protocol(format!("Failed to decode response: {}", e)))
    }
}
