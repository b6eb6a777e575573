//! Core DDNS engine
//!
//! The DdnsEngine performs one update per process run:
//! - Takes the configured address, or asks the IpSource for one
//! - Builds the UpsertRequest for the configured record
//! - Submits it once via the DnsProvider
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐   (only when no --ip)   ┌──────────────┐
//! │  IpSource   │ ──────── Ipv4Addr ─────▶│  DdnsEngine  │
//! └─────────────┘                         └──────────────┘
//!                                                 │ UpsertRequest
//!                                                 ▼
//!                                         ┌──────────────┐
//!                                         │ DnsProvider  │
//!                                         └──────────────┘
//! ```
//!
//! Any error ends the run. Nothing is retried and nothing is persisted.
//! Failures are returned to the caller unlogged above debug level; the
//! caller reports them.

use crate::config::DdnsConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, IpSource, UpsertRequest};
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// Where the address of a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpOrigin {
    /// Supplied in the configuration
    Explicit,
    /// Discovered by the IpSource
    Resolved,
}

impl std::fmt::Display for IpOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpOrigin::Explicit => f.write_str("explicit"),
            IpOrigin::Resolved => f.write_str("resolved"),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// The request accepted by the provider
    pub request: UpsertRequest,
    /// Where the address came from
    pub origin: IpOrigin,
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`] (validates the configuration)
/// 2. Call [`DdnsEngine::run_once()`]
/// 3. Drop
pub struct DdnsEngine {
    /// IP source, consulted only when no address is configured
    ip_source: Box<dyn IpSource>,

    /// DNS provider for submitting the change
    provider: Box<dyn DnsProvider>,

    /// Validated configuration
    config: DdnsConfig,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: DDNS configuration
    ///
    /// # Returns
    ///
    /// - `Ok(DdnsEngine)`: Ready to run
    /// - `Err(Error::Config)`: If the configuration is invalid
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            provider,
            config,
        })
    }

    /// Run one update
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateReport)`: The provider accepted the change
    /// - `Err(Error)`: Resolution or provider failure; when resolution
    ///   fails the provider is never called
    pub async fn run_once(&self) -> Result<UpdateReport> {
        let (ip, origin) = self.resolve_ip().await?;
        info!("Using {} address {}", origin, ip);

        let request = self.build_request(ip);

        debug!(
            "Submitting {} {} -> {} (ttl {}) via {}",
            request.record_type,
            request.name,
            request.value,
            request.ttl,
            self.provider.provider_name()
        );

        if let Err(e) = self.provider.upsert_record(&request).await {
            debug!("Provider rejected {}: {}", request.name, e);
            return Err(e);
        }

        info!("Upserted {} -> {}", request.name, request.value);
        Ok(UpdateReport { request, origin })
    }

    /// Determine the address for this run
    async fn resolve_ip(&self) -> Result<(Ipv4Addr, IpOrigin)> {
        if let Some(ip) = self.config.ip_address {
            debug!("Address supplied in configuration, skipping lookup");
            return Ok((ip, IpOrigin::Explicit));
        }

        debug!("Looking up public address via {}", self.ip_source.source_name());
        match self.ip_source.current().await {
            Ok(ip) => Ok((ip, IpOrigin::Resolved)),
            Err(e) => {
                debug!("Address lookup failed: {}", e);
                Err(e)
            }
        }
    }

    /// Build the single upsert for the configured record
    fn build_request(&self, ip: Ipv4Addr) -> UpsertRequest {
        UpsertRequest::a_record(self.config.record.name.clone(), ip, self.config.record.ttl)
    }
}
