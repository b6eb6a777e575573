//! Test doubles and common utilities for contract tests
//!
//! The doubles count calls and record what they were handed; they never
//! touch the network.

#![allow(dead_code)]

use ddns_core::config::{DdnsConfig, ProviderConfig, RecordConfig};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, IpSource, UpsertRequest};
use std::io;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a [`MockIpSource`] answers with
#[derive(Clone)]
pub enum LookupBehavior {
    Answer(Ipv4Addr),
    NetworkError(io::ErrorKind),
    NotFound,
    BadResponse,
}

/// An IpSource that counts lookups
pub struct MockIpSource {
    behavior: LookupBehavior,
    call_count: Arc<AtomicUsize>,
}

impl MockIpSource {
    pub fn answering(ip: Ipv4Addr) -> Self {
        Self::with_behavior(LookupBehavior::Answer(ip))
    }

    pub fn failing(kind: io::ErrorKind) -> Self {
        Self::with_behavior(LookupBehavior::NetworkError(kind))
    }

    pub fn with_behavior(behavior: LookupBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new MockIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            behavior: other.behavior.clone(),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for MockIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            LookupBehavior::Answer(ip) => Ok(*ip),
            LookupBehavior::NetworkError(kind) => {
                Err(Error::Network(io::Error::new(*kind, "simulated network failure")))
            }
            LookupBehavior::NotFound => Err(Error::not_found("no A record in answer")),
            LookupBehavior::BadResponse => Err(Error::bad_response("SERVFAIL")),
        }
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

/// A DnsProvider that records every request it receives
pub struct MockDnsProvider {
    requests: Arc<Mutex<Vec<UpsertRequest>>>,
    reject_with: Option<String>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reject_with: None,
        }
    }

    /// A provider that rejects every request, e.g. for bad credentials
    pub fn rejecting(message: &str) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reject_with: Some(message.to_string()),
        }
    }

    /// Get the number of times upsert_record() was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Get the requests received so far
    pub fn requests(&self) -> Vec<UpsertRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Create a new MockDnsProvider that shares state with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            requests: Arc::clone(&other.requests),
            reject_with: other.reject_with.clone(),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn upsert_record(&self, request: &UpsertRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.reject_with {
            Some(message) => Err(Error::provider("mock", message.clone())),
            None => Ok(()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a valid DdnsConfig for testing
pub fn test_config(hostname: &str, ip_address: Option<Ipv4Addr>) -> DdnsConfig {
    DdnsConfig::new(
        ProviderConfig::route53("AKIDEXAMPLE", "test-secret", "Z0123456789"),
        RecordConfig::new(hostname),
    )
    .with_ip_address(ip_address)
}
