pub mod args;

use crate::types::{ClientConfigLocation, S3Credentials, ScanTarget};

/// Flat monthly storage rate used for the cost projection, per GB (10^9 bytes).
pub const DEFAULT_PRICE_PER_GB_MONTH: f64 = 0.03;

/// Region S3 reports as "no location constraint".
pub const DEFAULT_REGION: &str = "us-east-1";

/// Page size for ListObjectVersions (S3 maximum).
pub const DEFAULT_MAX_KEYS: i32 = 1000;

/// Main configuration for one s3r run.
///
/// Built from the command line via `Config::try_from(CLIArgs)`, or directly
/// with [`Config::for_target`] for library use.
///
/// ```
/// use s3r_rs::Config;
///
/// let mut config = Config::for_target("my-bucket", "logs/2024/");
/// config.skip_listing = true;
/// assert_eq!(config.max_keys, 1000);
/// assert_eq!(config.target.to_string(), "s3://my-bucket/logs/2024/");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub target: ScanTarget,
    /// Skip the scan/summary/cost pass and go straight to the confirmation prompt.
    pub skip_listing: bool,
    pub price_per_gb_month: f64,
    pub max_keys: i32,
    pub client_config: Option<ClientConfig>,
    pub tracing_config: Option<TracingConfig>,
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

impl Config {
    pub fn for_target(bucket: &str, prefix: &str) -> Self {
        Config {
            target: ScanTarget::new(bucket, prefix),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target: ScanTarget::new("", ""),
            skip_listing: false,
            price_per_gb_month: DEFAULT_PRICE_PER_GB_MONTH,
            max_keys: DEFAULT_MAX_KEYS,
            client_config: Some(ClientConfig::default()),
            tracing_config: None,
            auto_complete_shell: None,
        }
    }
}

/// AWS S3 client configuration.
///
/// `region` is the operator's choice for the bootstrap client. After the
/// bucket region is resolved the client is rebuilt via [`ClientConfig::with_region`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_config_location: ClientConfigLocation,
    pub credential: S3Credentials,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub retry_config: RetryConfig,
    pub cli_timeout_config: CLITimeoutConfig,
}

impl ClientConfig {
    pub fn with_region(&self, region: &str) -> Self {
        ClientConfig {
            region: Some(region.to_string()),
            ..self.clone()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            client_config_location: ClientConfigLocation::default(),
            credential: S3Credentials::FromEnvironment,
            region: None,
            endpoint_url: None,
            force_path_style: false,
            retry_config: RetryConfig::default(),
            cli_timeout_config: CLITimeoutConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub aws_max_attempts: u32,
    pub initial_backoff_milliseconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            aws_max_attempts: 10,
            initial_backoff_milliseconds: 100,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CLITimeoutConfig {
    pub operation_timeout_milliseconds: Option<u64>,
    pub operation_attempt_timeout_milliseconds: Option<u64>,
    pub connect_timeout_milliseconds: Option<u64>,
    pub read_timeout_milliseconds: Option<u64>,
}

/// Tracing (logging) configuration.
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    pub tracing_level: log::Level,
    pub json_tracing: bool,
    pub aws_sdk_tracing: bool,
    pub span_events_tracing: bool,
    pub disable_color_tracing: bool,
}
