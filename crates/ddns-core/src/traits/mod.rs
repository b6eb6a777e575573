//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the current public IPv4 address
//! - [`DnsProvider`]: Submit a record upsert via a provider API

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{DnsProvider, RecordType, UPSERT_COMMENT, UpsertRequest};
pub use ip_source::IpSource;
