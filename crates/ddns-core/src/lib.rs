// # ddns-core
//
// Core library for the Route 53 dynamic DNS updater.
//
// ## Architecture Overview
//
// One run of the updater is a straight line:
// - **IpSource**: Trait for discovering the current public IPv4 address
// - **DnsProvider**: Trait for submitting one record upsert to a provider API
// - **DdnsEngine**: Resolves the address (unless one was configured) and
//   hands a single `UpsertRequest` to the provider
//
// Implementations live in their own crates (`ddns-ip-opendns`,
// `ddns-provider-route53`) so the engine can be exercised with test doubles.

pub mod config;
pub mod engine;
pub mod error;
pub mod traits;

// Re-export core types for convenience
pub use config::{DdnsConfig, ProviderConfig, RecordConfig};
pub use engine::{DdnsEngine, IpOrigin, UpdateReport};
pub use error::{Error, Result};
pub use traits::{DnsProvider, IpSource, RecordType, UpsertRequest};
