//! Configuration types for the DDNS system
//!
//! A [`DdnsConfig`] is built once at startup and passed explicitly to the
//! engine; nothing here is read from globals after that point.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Default record TTL in seconds
pub const DEFAULT_TTL: u32 = 60;

/// Largest TTL Route 53 accepts (a signed 32-bit value)
pub const MAX_TTL: u32 = i32::MAX as u32;

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// The record to upsert
    pub record: RecordConfig,

    /// Explicit address; when set, no IP lookup takes place
    #[serde(default)]
    pub ip_address: Option<Ipv4Addr>,
}

impl DdnsConfig {
    /// Create a new configuration
    pub fn new(provider: ProviderConfig, record: RecordConfig) -> Self {
        Self {
            provider,
            record,
            ip_address: None,
        }
    }

    /// Use a fixed address instead of discovering one
    pub fn with_ip_address(mut self, ip: Option<Ipv4Addr>) -> Self {
        self.ip_address = ip;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.record.validate()?;

        Ok(())
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// AWS Route 53 provider
    Route53 {
        /// AWS access key id
        access_key_id: String,
        /// AWS secret access key
        /// ⚠️ NEVER log this value
        #[serde(skip_serializing)]
        secret_access_key: String,
        /// Hosted zone the record lives in
        hosted_zone_id: String,
        /// Endpoint override (local emulators, tests)
        #[serde(default)]
        endpoint_url: Option<String>,
        /// Build the change but do not submit it
        #[serde(default)]
        dry_run: bool,
    },
}

impl ProviderConfig {
    /// Create a Route 53 configuration with default endpoint, live mode
    pub fn route53(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        hosted_zone_id: impl Into<String>,
    ) -> Self {
        ProviderConfig::Route53 {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            hosted_zone_id: hosted_zone_id.into(),
            endpoint_url: None,
            dry_run: false,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Route53 {
                access_key_id,
                secret_access_key,
                hosted_zone_id,
                endpoint_url,
                ..
            } => {
                if access_key_id.trim().is_empty() {
                    return Err(crate::Error::config("AWS access key id cannot be empty"));
                }
                if secret_access_key.trim().is_empty() {
                    return Err(crate::Error::config("AWS secret access key cannot be empty"));
                }
                if hosted_zone_id.trim().is_empty() {
                    return Err(crate::Error::config("Hosted zone id cannot be empty"));
                }
                if let Some(url) = endpoint_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "Endpoint URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Route53 { .. } => "route53",
        }
    }
}

// Custom Debug implementation that hides the secret key
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Route53 {
                access_key_id,
                hosted_zone_id,
                endpoint_url,
                dry_run,
                ..
            } => f
                .debug_struct("Route53")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"<REDACTED>")
                .field("hosted_zone_id", hosted_zone_id)
                .field("endpoint_url", endpoint_url)
                .field("dry_run", dry_run)
                .finish(),
        }
    }
}

/// DNS record configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Fully-qualified record name (e.g., "home.example.com")
    pub name: String,

    /// Time-to-live in seconds
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl RecordConfig {
    /// Create a new record configuration with the default TTL
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Validate the record configuration
    ///
    /// Only structural limits from RFC 1035 are checked; the provider is
    /// the authority on which characters it accepts.
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_domain_name(&self.name)?;

        if self.ttl > MAX_TTL {
            return Err(crate::Error::config(format!(
                "TTL must be at most {} seconds. Got: {}",
                MAX_TTL, self.ttl
            )));
        }

        Ok(())
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    let name = domain.strip_suffix('.').unwrap_or(domain);

    if name.is_empty() {
        return Err(crate::Error::config("Hostname cannot be empty"));
    }

    if name.len() > 253 {
        return Err(crate::Error::config(format!(
            "Hostname too long: {} chars (max 253). Got: {}",
            name.len(),
            domain
        )));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Hostname has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Hostname label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }
    }

    Ok(())
}
