// # OpenDNS Echo IP Source
//
// This crate provides an IP source that discovers the caller's public IPv4
// address with a single DNS query.
//
// ## How It Works
//
// OpenDNS resolvers answer the special name `myip.opendns.com` with the
// address the query arrived from. One resolver is picked at random from a
// fixed pool of four, queried for an A record with recursion disabled (the
// resolvers are authoritative for the name), and the first A answer wins.
//
// ## Failure Modes
//
// - Transport failure: `Error::Network` (the `io::Error` is preserved)
// - Non-NOERROR response code or mismatched message id: `Error::BadResponse`
// - NOERROR without any A answer: `Error::NotFound`
//
// There is no retry and no fallback to another resolver in the pool.

pub mod transport;

pub use transport::{DnsTransport, UdpTransport};

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, RData, RecordType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::net::Ipv4Addr;
use std::sync::Mutex;

/// Name the echo resolvers answer with the client's own address
pub const ECHO_HOSTNAME: &str = "myip.opendns.com.";

/// Resolvers that serve [`ECHO_HOSTNAME`]
pub const OPENDNS_RESOLVERS: [&str; 4] = [
    "resolver1.opendns.com:53",
    "resolver2.opendns.com:53",
    "resolver3.opendns.com:53",
    "resolver4.opendns.com:53",
];

/// Pick one server uniformly at random
///
/// Returns `None` for an empty list.
pub fn select_server<'a, R: Rng + ?Sized>(servers: &'a [String], rng: &mut R) -> Option<&'a str> {
    if servers.is_empty() {
        return None;
    }

    let index = rng.random_range(0..servers.len());
    Some(servers[index].as_str())
}

/// Build the echo query: type A, recursion not desired
pub fn build_query(id: u16) -> Result<Message> {
    let name = Name::from_ascii(ECHO_HOSTNAME)
        .map_err(|e| Error::protocol(format!("Invalid echo hostname: {}", e)))?;

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(false)
        .add_query(Query::query(name, RecordType::A));

    Ok(message)
}

/// Extract the first A answer from a response
///
/// Answers are taken in response order with no further checks on the
/// address itself.
pub fn first_a_record(response: &Message) -> Result<Ipv4Addr> {
    let code = response.response_code();
    if code != ResponseCode::NoError {
        return Err(Error::bad_response(format!("resolver answered {}", code)));
    }

    response
        .answers()
        .iter()
        .find_map(|record| match record.data() {
            Some(RData::A(a)) => Some(a.0),
            _ => None,
        })
        .ok_or_else(|| Error::not_found(format!("no A record for {} in response", ECHO_HOSTNAME)))
}

/// DNS echo IP source
///
/// # Determinism
///
/// The random source is injectable with [`DnsEchoIpSource::with_rng`], so a
/// seeded generator makes resolver choice and query ids reproducible.
pub struct DnsEchoIpSource {
    /// Candidate resolvers as `host:port`
    servers: Vec<String>,

    /// Wire transport
    transport: Box<dyn DnsTransport>,

    /// Drives resolver choice and query ids
    rng: Mutex<StdRng>,
}

impl DnsEchoIpSource {
    /// Create a source over the OpenDNS resolver pool
    pub fn new() -> Self {
        Self::with_servers(OPENDNS_RESOLVERS.iter().map(|s| s.to_string()).collect())
    }

    /// Create a source over a custom resolver pool
    pub fn with_servers(servers: Vec<String>) -> Self {
        Self {
            servers,
            transport: Box::new(UdpTransport::default()),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Replace the transport
    pub fn with_transport(mut self, transport: impl DnsTransport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Replace the random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// The resolver pool
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    /// Look up the public address once
    pub async fn lookup(&self) -> Result<Ipv4Addr> {
        let (server, id) = self.next_query()?;
        let query = build_query(id)?;

        tracing::debug!("Querying {} for {}", server, ECHO_HOSTNAME);
        let response = self.transport.exchange(&server, &query).await?;

        if response.id() != query.id() {
            return Err(Error::bad_response(format!(
                "message id mismatch from {}: sent {}, got {}",
                server,
                query.id(),
                response.id()
            )));
        }

        let ip = first_a_record(&response)?;
        tracing::info!("Public address {} reported by {}", ip, server);
        Ok(ip)
    }

    /// Draw the resolver and message id for one query
    fn next_query(&self) -> Result<(String, u16)> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::config("random source lock poisoned"))?;

        let server = select_server(&self.servers, &mut *rng)
            .ok_or_else(|| Error::config("No resolvers configured"))?
            .to_string();
        let id = rng.random::<u16>();

        Ok((server, id))
    }
}

impl Default for DnsEchoIpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IpSource for DnsEchoIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.lookup().await
    }

    fn source_name(&self) -> &'static str {
        "opendns"
    }
}
