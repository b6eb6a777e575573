// # Route 53 DNS Provider
//
// This crate provides an AWS Route 53 DNS provider implementation for the
// DDNS system.
//
// ## Behavior
//
// - One `ChangeResourceRecordSets` call per upsert, carrying a change batch
//   with exactly one UPSERT change
// - Static credentials only (no session token, no credential chain)
// - SDK retries disabled: a failure is returned to the caller as-is
// - No propagation polling: an accepted change is a success
// - Dry-run mode builds and logs the change batch without submitting it
//
// ## Security Requirements
//
// - The secret access key NEVER appears in logs or Debug output
// - Provider construction fails fast on empty credentials or zone id
//
// ## API Reference
//
// - ChangeResourceRecordSets: POST `/2013-04-01/hostedzone/{Id}/rrset/`

use async_trait::async_trait;
use aws_sdk_route53::Client;
use aws_sdk_route53::config::retry::RetryConfig;
use aws_sdk_route53::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_route53::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use ddns_core::config::ProviderConfig;
use ddns_core::traits::{DnsProvider, RecordType, UpsertRequest};
use ddns_core::{Error, Result};

/// Route 53 is a global service; requests are signed for this region
const ROUTE53_SIGNING_REGION: &str = "us-east-1";

/// Name reported in logs and provider errors
const PROVIDER_NAME: &str = "route53";

/// Credentials provider name shown in SDK diagnostics
const CREDENTIALS_SOURCE: &str = "ddns-static";

/// Build the change batch for one upsert
///
/// The batch holds exactly one UPSERT change whose record set carries the
/// request's name, type, TTL and single value.
pub fn build_change_batch(request: &UpsertRequest) -> Result<ChangeBatch> {
    let record = ResourceRecord::builder()
        .value(request.value.to_string())
        .build()
        .map_err(build_error)?;

    let record_set = ResourceRecordSet::builder()
        .name(&request.name)
        .r#type(rr_type(request.record_type))
        .ttl(i64::from(request.ttl))
        .resource_records(record)
        .build()
        .map_err(build_error)?;

    let change = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set)
        .build()
        .map_err(build_error)?;

    ChangeBatch::builder()
        .comment(&request.comment)
        .changes(change)
        .build()
        .map_err(build_error)
}

fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
    }
}

/// Operator-facing text for a failed API call
///
/// Service errors are reduced to the API's code and message; anything else
/// (dispatch, timeout, unparseable response) keeps the full error chain.
fn sdk_error_message<E, R>(e: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service) = e.as_service_error() {
        match (service.code(), service.message()) {
            (Some(code), Some(message)) => return format!("{}: {}", code, message),
            (Some(code), None) => return code.to_string(),
            _ => {}
        }
    }
    DisplayErrorContext(e).to_string()
}

fn build_error(e: BuildError) -> Error {
    Error::provider(PROVIDER_NAME, format!("Failed to build change batch: {}", e))
}

/// Route 53 DNS provider
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the secret key.
pub struct Route53Provider {
    /// Route 53 API client
    client: Client,

    /// Hosted zone the record lives in
    hosted_zone_id: String,

    /// Access key id (kept for diagnostics only)
    access_key_id: String,

    /// Endpoint override, if any
    endpoint_url: Option<String>,

    /// Dry-run mode: if true, build the change but skip the API call
    dry_run: bool,
}

// Custom Debug implementation that hides the secret key
impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .field("hosted_zone_id", &self.hosted_zone_id)
            .field("endpoint_url", &self.endpoint_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Route53Provider {
    /// Create a new Route 53 provider
    ///
    /// # Parameters
    ///
    /// - `access_key_id` / `secret_access_key`: static IAM credentials with
    ///   `route53:ChangeResourceRecordSets` on the zone
    /// - `hosted_zone_id`: The zone to change (with or without the
    ///   `/hostedzone/` prefix)
    /// - `endpoint_url`: Optional endpoint override
    /// - `dry_run`: If true, build the change batch but skip the API call
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        hosted_zone_id: impl Into<String>,
        endpoint_url: Option<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let access_key_id = access_key_id.into();
        let secret_access_key = secret_access_key.into();
        let hosted_zone_id = hosted_zone_id.into();

        if access_key_id.is_empty() || secret_access_key.is_empty() {
            return Err(Error::config("Route 53 credentials are required"));
        }
        if hosted_zone_id.is_empty() {
            return Err(Error::config("Route 53 hosted zone id is required"));
        }

        let credentials = Credentials::new(
            access_key_id.clone(),
            secret_access_key,
            None,
            None,
            CREDENTIALS_SOURCE,
        );

        let mut builder = aws_sdk_route53::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(ROUTE53_SIGNING_REGION))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled());

        if let Some(url) = &endpoint_url {
            builder = builder.endpoint_url(url.clone());
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            hosted_zone_id,
            access_key_id,
            endpoint_url,
            dry_run,
        })
    }

    /// Create a provider from configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Route53 {
                access_key_id,
                secret_access_key,
                hosted_zone_id,
                endpoint_url,
                dry_run,
            } => {
                if *dry_run {
                    tracing::warn!(
                        "Route 53 provider running in DRY-RUN mode - no changes will be made"
                    );
                }

                Self::new(
                    access_key_id.clone(),
                    secret_access_key.clone(),
                    hosted_zone_id.clone(),
                    endpoint_url.clone(),
                    *dry_run,
                )
            }
        }
    }

    /// The hosted zone this provider changes
    pub fn hosted_zone_id(&self) -> &str {
        &self.hosted_zone_id
    }

    /// Whether changes are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn upsert_record(&self, request: &UpsertRequest) -> Result<()> {
        let batch = build_change_batch(request)?;

        if self.dry_run {
            tracing::warn!(
                "DRY-RUN: would UPSERT {} {} -> {} (ttl {}) in zone {}",
                request.record_type,
                request.name,
                request.value,
                request.ttl,
                self.hosted_zone_id
            );
            tracing::debug!("DRY-RUN change batch: {:?}", batch);
            return Ok(());
        }

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&self.hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, sdk_error_message(&e)))?;

        tracing::debug!("ChangeResourceRecordSets accepted: {:?}", output);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
