// # route53-ddns
//
// Thin integration layer: parse options, build the components, run one
// update, report the outcome through the exit code. All update logic lives
// in ddns-core and the provider/IP-source crates.
//
// ## Configuration
//
// Every option is a flag; most also fall back to an environment variable.
// A flag on the command line wins over the environment.
//
// - `--access-key-id` / `AWS_ACCESS_KEY_ID` (required)
// - `--secret-access-key` / `AWS_SECRET_ACCESS_KEY` (required)
// - `--hosted-zone-id` / `AWS_HOSTED_ZONE_ID` (required)
// - `--hostname` / `HOSTNAME` (required): the record to upsert
// - `--ip`: use this address instead of asking OpenDNS
// - `--ttl`: record TTL in seconds (default 60)
// - `--endpoint-url` / `DDNS_ROUTE53_ENDPOINT`: Route 53 endpoint override
// - `--dry-run` / `DDNS_DRY_RUN`: build the change but do not submit it
// - `--log-level` / `DDNS_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export AWS_ACCESS_KEY_ID=AKIA...
// export AWS_SECRET_ACCESS_KEY=...
// export AWS_HOSTED_ZONE_ID=Z0123456789
//
// route53-ddns --hostname home.example.com --ttl 300
// ```

use anyhow::{Context, Result};
use clap::Parser;
use ddns_core::DdnsEngine;
use ddns_core::config::{DEFAULT_TTL, DdnsConfig, ProviderConfig, RecordConfig};
use ddns_ip_opendns::DnsEchoIpSource;
use ddns_provider_route53::Route53Provider;
use std::net::Ipv4Addr;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// Every failure (bad options, lookup, provider) shares one code; the
/// message on stderr tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Record upserted (or help/version printed)
    Success = 0,
    /// Any failure
    Failure = 1,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Command-line options
#[derive(Parser)]
#[command(name = "route53-ddns", version)]
#[command(about = "Point a Route 53 A record at this machine's public IPv4 address")]
struct Args {
    /// AWS access key id
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: String,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: String,

    /// Route 53 hosted zone id
    #[arg(long, env = "AWS_HOSTED_ZONE_ID")]
    hosted_zone_id: String,

    /// IPv4 address to publish; looked up via OpenDNS when omitted
    #[arg(long = "ip", value_name = "IPV4")]
    ip: Option<Ipv4Addr>,

    /// Fully-qualified record name to upsert
    #[arg(long, env = "HOSTNAME")]
    hostname: String,

    /// Record TTL in seconds
    #[arg(long, default_value_t = DEFAULT_TTL)]
    ttl: u32,

    /// Route 53 endpoint override
    #[arg(long, env = "DDNS_ROUTE53_ENDPOINT", value_name = "URL")]
    endpoint_url: Option<String>,

    /// Build the change but do not submit it
    #[arg(long, env = "DDNS_DRY_RUN")]
    dry_run: bool,

    /// Log verbosity
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: Level,
}

impl Args {
    /// Convert parsed options into the engine configuration
    fn into_config(self) -> DdnsConfig {
        let provider = ProviderConfig::Route53 {
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            hosted_zone_id: self.hosted_zone_id,
            endpoint_url: self.endpoint_url,
            dry_run: self.dry_run,
        };

        DdnsConfig::new(provider, RecordConfig::new(self.hostname).with_ttl(self.ttl))
            .with_ip_address(self.ip)
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::Failure.into()
            } else {
                DdnsExitCode::Success.into()
            };
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::Failure.into();
    }

    let config = args.into_config();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::Failure.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::Failure.into();
        }
    };

    rt.block_on(execute(config)).into()
}

/// Run one update and map the outcome to an exit code
async fn execute(config: DdnsConfig) -> DdnsExitCode {
    match run(config).await {
        Ok(()) => DdnsExitCode::Success,
        Err(e) => {
            error!("{:#}", e);
            DdnsExitCode::Failure
        }
    }
}

/// Build the components and run one update
async fn run(config: DdnsConfig) -> Result<()> {
    let provider = Route53Provider::from_config(&config.provider)?;
    let engine = DdnsEngine::new(Box::new(DnsEchoIpSource::new()), Box::new(provider), config)?;

    let report = engine
        .run_once()
        .await
        .context("DNS update failed")?;

    info!(
        "{} {} -> {} ({} address, ttl {})",
        report.request.record_type,
        report.request.name,
        report.request.value,
        report.origin,
        report.request.ttl
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn full_args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
        let mut args = vec![
            "route53-ddns",
            "--access-key-id",
            "AKIDEXAMPLE",
            "--secret-access-key",
            "test-secret",
            "--hosted-zone-id",
            "Z0123456789",
            "--hostname",
            "h.example.com",
        ];
        args.extend_from_slice(extra);
        args
    }

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_all_flags() {
        let args =
            Args::try_parse_from(full_args(&["--ip", "198.51.100.7", "--ttl", "120"])).unwrap();
        let config = args.into_config();

        assert!(config.validate().is_ok());
        assert_eq!(config.ip_address, Some(Ipv4Addr::new(198, 51, 100, 7)));
        assert_eq!(config.record.name, "h.example.com");
        assert_eq!(config.record.ttl, 120);
        match &config.provider {
            ProviderConfig::Route53 {
                access_key_id,
                secret_access_key,
                hosted_zone_id,
                ..
            } => {
                assert_eq!(access_key_id, "AKIDEXAMPLE");
                assert_eq!(secret_access_key, "test-secret");
                assert_eq!(hosted_zone_id, "Z0123456789");
            }
        }
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(full_args(&[])).unwrap();

        assert_eq!(args.ttl, 60);
        assert_eq!(args.ip, None);
    }

    #[test]
    fn test_environment_fallback_and_precedence() {
        // Only this test touches these variables; every other test passes
        // the required options as flags.
        unsafe {
            std::env::set_var("AWS_ACCESS_KEY_ID", "AKIDFROMENV");
            std::env::set_var("AWS_SECRET_ACCESS_KEY", "secret-from-env");
            std::env::set_var("AWS_HOSTED_ZONE_ID", "ZFROMENV");
            std::env::set_var("HOSTNAME", "env.example.com");
        }

        let from_env = Args::try_parse_from(["route53-ddns"]).unwrap();
        let from_flags = Args::try_parse_from(full_args(&[])).unwrap();

        unsafe {
            std::env::remove_var("AWS_ACCESS_KEY_ID");
            std::env::remove_var("AWS_SECRET_ACCESS_KEY");
            std::env::remove_var("AWS_HOSTED_ZONE_ID");
            std::env::remove_var("HOSTNAME");
        }

        assert_eq!(from_env.access_key_id, "AKIDFROMENV");
        assert_eq!(from_env.secret_access_key, "secret-from-env");
        assert_eq!(from_env.hosted_zone_id, "ZFROMENV");
        assert_eq!(from_env.hostname, "env.example.com");

        assert_eq!(from_flags.access_key_id, "AKIDEXAMPLE");
        assert_eq!(from_flags.secret_access_key, "test-secret");
        assert_eq!(from_flags.hosted_zone_id, "Z0123456789");
        assert_eq!(from_flags.hostname, "h.example.com");
    }

    #[test]
    fn test_malformed_ttl_rejected() {
        assert!(Args::try_parse_from(full_args(&["--ttl", "abc"])).is_err());
        assert!(Args::try_parse_from(full_args(&["--ttl", "-5"])).is_err());
    }

    #[test]
    fn test_malformed_ip_rejected() {
        assert!(Args::try_parse_from(full_args(&["--ip", "not-an-ip"])).is_err());
        assert!(Args::try_parse_from(full_args(&["--ip", "2001:db8::1"])).is_err());
        assert!(Args::try_parse_from(full_args(&["--ip", "256.1.1.1"])).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        assert!(Args::try_parse_from(full_args(&["--log-level", "loud"])).is_err());
    }

    const CHANGE_ACCEPTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ChangeResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <ChangeInfo>
    <Id>/change/C2682N5HXP0BZ4</Id>
    <Status>PENDING</Status>
    <SubmittedAt>2017-03-10T01:36:41.958Z</SubmittedAt>
  </ChangeInfo>
</ChangeResourceRecordSetsResponse>"#;

    const ACCESS_DENIED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <Error>
    <Type>Sender</Type>
    <Code>InvalidClientTokenId</Code>
    <Message>The security token included in the request is invalid.</Message>
  </Error>
  <RequestId>4f2c1f7e-0000-0000-0000-000000000000</RequestId>
</ErrorResponse>"#;

    /// Config for an explicit-IP run against a mock Route 53 endpoint
    fn mock_endpoint_config(server: &MockServer) -> DdnsConfig {
        Args::try_parse_from([
            "route53-ddns",
            "--access-key-id",
            "AKIDEXAMPLE",
            "--secret-access-key",
            "test-secret",
            "--hosted-zone-id",
            "/hostedzone/Z0123456789",
            "--hostname",
            "h.example.com",
            "--ip",
            "198.51.100.7",
            "--endpoint-url",
            &server.uri(),
        ])
        .unwrap()
        .into_config()
    }

    async fn mount_rrset(server: &MockServer, status: u16, body: &'static str, calls: u64) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/2013-04-01/hostedzone/Z0123456789/rrset/?$"))
            .respond_with(ResponseTemplate::new(status).set_body_raw(body, "text/xml"))
            .expect(calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_accepted_change_exits_success() {
        let server = MockServer::start().await;
        mount_rrset(&server, 200, CHANGE_ACCEPTED, 1).await;

        let code = execute(mock_endpoint_config(&server)).await;
        assert_eq!(code, DdnsExitCode::Success);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);

        let body = String::from_utf8(requests[0].body.clone()).unwrap();
        assert!(body.contains("<Value>198.51.100.7</Value>"));
        assert!(body.contains("<TTL>60</TTL>"));
        assert!(body.contains("<Comment>DynDNS update</Comment>"));
    }

    #[tokio::test]
    async fn test_rejected_change_exits_failure() {
        let server = MockServer::start().await;
        // once through run(), once through execute()
        mount_rrset(&server, 403, ACCESS_DENIED, 2).await;

        let config = mock_endpoint_config(&server);
        let err = run(config.clone()).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("DNS update failed"), "{}", message);
        assert!(message.contains("InvalidClientTokenId"), "{}", message);

        assert_eq!(execute(config).await, DdnsExitCode::Failure);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[test]
    fn test_help_is_not_a_failure() {
        let err = Args::try_parse_from(["route53-ddns", "--help"]).err().unwrap();
        assert!(!err.use_stderr());
    }
}
