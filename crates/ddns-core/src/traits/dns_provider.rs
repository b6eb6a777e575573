// # DNS Provider Trait
//
// Defines the interface for submitting record changes via provider APIs.
//
// ## Implementations
//
// - AWS Route 53: `ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, UpsertRequest};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let request = UpsertRequest::a_record("home.example.com", [192, 0, 2, 9].into(), 60);
//     provider.upsert_record(&request).await?;
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Comment attached to every change batch
pub const UPSERT_COMMENT: &str = "DynDNS update";

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    A,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired state of one DNS record
///
/// Built once per run and handed to the provider unchanged. Applying the
/// same request twice leaves the zone in the same state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertRequest {
    /// Fully-qualified record name
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Record value
    pub value: Ipv4Addr,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Human-readable change comment
    pub comment: String,
}

impl UpsertRequest {
    /// Create an A-record upsert with the standard comment
    pub fn a_record(name: impl Into<String>, value: Ipv4Addr, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::A,
            value,
            ttl,
            comment: UPSERT_COMMENT.to_string(),
        }
    }
}

/// Trait for DNS provider implementations
///
/// # Contract
///
/// - **Single-shot**: exactly one API call per invocation
/// - **No retry**: a failure is returned to the caller as-is
/// - **Stateless**: nothing is cached between calls
///
/// Success means the provider accepted the change for propagation; callers
/// do not wait for it to be visible in DNS.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Submit an upsert of one record
    ///
    /// # Parameters
    ///
    /// - `request`: The desired record state
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the change
    /// - `Err(Error)`: If the provider rejected the request or could not be reached
    async fn upsert_record(&self, request: &UpsertRequest) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "route53")
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_record_request() {
        let request = UpsertRequest::a_record("h.example.com", Ipv4Addr::new(203, 0, 113, 5), 120);

        assert_eq!(request.name, "h.example.com");
        assert_eq!(request.record_type, RecordType::A);
        assert_eq!(request.value.to_string(), "203.0.113.5");
        assert_eq!(request.ttl, 120);
        assert_eq!(request.comment, "DynDNS update");
    }

    #[test]
    fn test_record_type_display() {
        assert_eq!(RecordType::A.to_string(), "A");
    }
}
