use crate::config::{
    CLITimeoutConfig, ClientConfig, Config, DEFAULT_MAX_KEYS, DEFAULT_PRICE_PER_GB_MONTH,
    RetryConfig, TracingConfig,
};
use crate::types::{AccessKeys, ClientConfigLocation, S3Credentials, ScanTarget};
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::ffi::OsString;
use std::path::PathBuf;

mod value_parser;


const DEFAULT_NO_LIST: bool = false;
const DEFAULT_AWS_MAX_ATTEMPTS: u32 = 10;
const DEFAULT_INITIAL_BACKOFF_MILLISECONDS: u64 = 100;
const DEFAULT_JSON_TRACING: bool = false;
const DEFAULT_AWS_SDK_TRACING: bool = false;
const DEFAULT_SPAN_EVENTS_TRACING: bool = false;
const DEFAULT_DISABLE_COLOR_TRACING: bool = false;
const DEFAULT_FORCE_PATH_STYLE: bool = false;
const MAX_KEYS_LIMIT: i32 = 1000;

const ERROR_MESSAGE_MISSING_BUCKET: &str =
    "Please supply at least a bucket name & if needed a path to delete: s3r bucket.name path/to/delete";
const ERROR_MESSAGE_MAX_KEYS_OUT_OF_RANGE: &str = "Max keys must be between 1 and 1000.";
const ERROR_MESSAGE_INVALID_PRICE: &str =
    "Price per GB-month must be a finite number greater than or equal to 0.";
const ERROR_MESSAGE_SECRET_KEY_WITHOUT_ACCESS_KEY: &str =
    "--target-secret-key requires --target-access-key.";

/// s3r - Delete every object version and delete marker under an S3 prefix.
///
/// Lists what will be destroyed and its estimated monthly storage cost,
/// asks for confirmation, then deletes each version one by one.
///
/// Example:
///   s3r my-bucket logs/2023/
///   s3r my-bucket tmp/ --no
#[derive(Parser, Clone, Debug)]
#[command(name = "s3r", version, about, long_about = None)]
pub struct CLIArgs {
    /// Bucket name.
    #[arg(
        value_parser = NonEmptyStringValueParser::new(),
        required_unless_present = "auto_complete_shell",
    )]
    pub bucket: Option<String>,

    /// Key prefix to delete. Defaults to the whole bucket.
    pub prefix: Option<String>,

    /// Do not list the contents first.
    #[arg(long = "no", env = "S3R_NO_LIST", default_value_t = DEFAULT_NO_LIST, help_heading = "General")]
    pub no_list: bool,

    /// Monthly storage price per GB used for the cost estimate.
    #[arg(long, env, default_value_t = DEFAULT_PRICE_PER_GB_MONTH, help_heading = "General")]
    pub price_per_gb_month: f64,

    // -----------------------------------------------------------------------
    // Logging options
    // -----------------------------------------------------------------------
    /// Verbosity level. -q (quiet), default (normal), -v, -vv, -vvv.
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Output logs in JSON format.
    #[arg(long, env, default_value_t = DEFAULT_JSON_TRACING, help_heading = "Logging")]
    pub json_tracing: bool,

    /// Enable AWS SDK tracing.
    #[arg(long, env, default_value_t = DEFAULT_AWS_SDK_TRACING, help_heading = "Logging")]
    pub aws_sdk_tracing: bool,

    /// Enable tracing span events.
    #[arg(long, env, default_value_t = DEFAULT_SPAN_EVENTS_TRACING, help_heading = "Logging")]
    pub span_events_tracing: bool,

    /// Disable colored output in logs.
    #[arg(long, env, default_value_t = DEFAULT_DISABLE_COLOR_TRACING, help_heading = "Logging")]
    pub disable_color_tracing: bool,

    // -----------------------------------------------------------------------
    // AWS configuration
    // -----------------------------------------------------------------------
    /// AWS config file path.
    #[arg(long, env, help_heading = "AWS")]
    pub aws_config_file: Option<PathBuf>,

    /// AWS shared credentials file path.
    #[arg(long, env, help_heading = "AWS")]
    pub aws_shared_credentials_file: Option<PathBuf>,

    /// AWS profile. If not set, uses the default credential chain.
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new(),
        conflicts_with_all = ["target_access_key"], help_heading = "AWS")]
    pub target_profile: Option<String>,

    /// AWS access key ID.
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new(),
        requires = "target_secret_key", help_heading = "AWS")]
    pub target_access_key: Option<String>,

    /// AWS secret access key.
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new(), help_heading = "AWS")]
    pub target_secret_key: Option<String>,

    /// AWS session token.
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new(), help_heading = "AWS")]
    pub target_session_token: Option<String>,

    /// Region used to look up the bucket location. The bucket's own region is used afterwards.
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new(), help_heading = "AWS")]
    pub target_region: Option<String>,

    /// Custom S3-compatible endpoint URL (e.g. MinIO).
    #[arg(long, env, value_parser = value_parser::url::check_scheme, help_heading = "AWS")]
    pub target_endpoint_url: Option<String>,

    /// Force path-style access (required for some S3-compatible services).
    #[arg(long, env, default_value_t = DEFAULT_FORCE_PATH_STYLE, help_heading = "AWS")]
    pub target_force_path_style: bool,

    // -----------------------------------------------------------------------
    // Retry options
    // -----------------------------------------------------------------------
    /// Maximum retry attempts for AWS SDK operations.
    #[arg(long, env, default_value_t = DEFAULT_AWS_MAX_ATTEMPTS, help_heading = "Retry")]
    pub aws_max_attempts: u32,

    /// Initial backoff in milliseconds for SDK retries.
    #[arg(long, env, default_value_t = DEFAULT_INITIAL_BACKOFF_MILLISECONDS, help_heading = "Retry")]
    pub initial_backoff_milliseconds: u64,

    // -----------------------------------------------------------------------
    // Timeout options
    // -----------------------------------------------------------------------
    /// Overall operation timeout in milliseconds.
    #[arg(long, env, help_heading = "Timeout")]
    pub operation_timeout_milliseconds: Option<u64>,

    /// Per-attempt operation timeout in milliseconds.
    #[arg(long, env, help_heading = "Timeout")]
    pub operation_attempt_timeout_milliseconds: Option<u64>,

    /// Connection timeout in milliseconds.
    #[arg(long, env, help_heading = "Timeout")]
    pub connect_timeout_milliseconds: Option<u64>,

    /// Read timeout in milliseconds.
    #[arg(long, env, help_heading = "Timeout")]
    pub read_timeout_milliseconds: Option<u64>,

    // -----------------------------------------------------------------------
    // Advanced options
    // -----------------------------------------------------------------------
    /// Max keys per ListObjectVersions request (1-1000).
    #[arg(long, env, default_value_t = DEFAULT_MAX_KEYS, help_heading = "Advanced")]
    pub max_keys: i32,

    /// Generate shell completions.
    #[arg(long, env, help_heading = "Advanced")]
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

/// Parse command-line arguments into a `CLIArgs` struct.
///
/// ```
/// use s3r_rs::config::args::parse_from_args;
///
/// let cli_args = parse_from_args(vec!["s3r", "my-bucket", "logs/", "--no"]).unwrap();
/// assert_eq!(cli_args.bucket.as_deref(), Some("my-bucket"));
/// assert!(cli_args.no_list);
/// ```
pub fn parse_from_args<I, T>(args: I) -> Result<CLIArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CLIArgs::try_parse_from(args)
}

/// Parse arguments and build a Config in one step.
pub fn build_config_from_args<I, T>(args: I) -> Result<Config, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli_args = CLIArgs::try_parse_from(args).map_err(|e| e.to_string())?;
    Config::try_from(cli_args)
}

impl CLIArgs {
    fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_KEYS_LIMIT).contains(&self.max_keys) {
            return Err(ERROR_MESSAGE_MAX_KEYS_OUT_OF_RANGE.to_string());
        }
        if !self.price_per_gb_month.is_finite() || self.price_per_gb_month < 0.0 {
            return Err(ERROR_MESSAGE_INVALID_PRICE.to_string());
        }
        if self.target_secret_key.is_some() && self.target_access_key.is_none() {
            return Err(ERROR_MESSAGE_SECRET_KEY_WITHOUT_ACCESS_KEY.to_string());
        }
        Ok(())
    }

    fn build_target(&self) -> Result<ScanTarget, String> {
        let bucket = self
            .bucket
            .as_deref()
            .ok_or_else(|| ERROR_MESSAGE_MISSING_BUCKET.to_string())?;

        Ok(ScanTarget::new(bucket, self.prefix.as_deref().unwrap_or("")))
    }

    fn build_client_config(&self) -> ClientConfig {
        let credential = if let Some(ref profile) = self.target_profile {
            S3Credentials::Profile(profile.clone())
        } else if let Some(ref access_key) = self.target_access_key {
            S3Credentials::Credentials {
                access_keys: AccessKeys {
                    access_key: access_key.clone(),
                    secret_access_key: self.target_secret_key.clone().unwrap_or_default(),
                    session_token: self.target_session_token.clone(),
                },
            }
        } else {
            S3Credentials::FromEnvironment
        };

        ClientConfig {
            client_config_location: ClientConfigLocation {
                aws_config_file: self.aws_config_file.clone(),
                aws_shared_credentials_file: self.aws_shared_credentials_file.clone(),
            },
            credential,
            region: self.target_region.clone(),
            endpoint_url: self.target_endpoint_url.clone(),
            force_path_style: self.target_force_path_style,
            retry_config: RetryConfig {
                aws_max_attempts: self.aws_max_attempts,
                initial_backoff_milliseconds: self.initial_backoff_milliseconds,
            },
            cli_timeout_config: CLITimeoutConfig {
                operation_timeout_milliseconds: self.operation_timeout_milliseconds,
                operation_attempt_timeout_milliseconds: self.operation_attempt_timeout_milliseconds,
                connect_timeout_milliseconds: self.connect_timeout_milliseconds,
                read_timeout_milliseconds: self.read_timeout_milliseconds,
            },
        }
    }

    fn build_tracing_config(&self) -> Option<TracingConfig> {
        let log_level = self.verbosity.log_level()?;

        Some(TracingConfig {
            tracing_level: log_level,
            json_tracing: self.json_tracing,
            aws_sdk_tracing: self.aws_sdk_tracing,
            span_events_tracing: self.span_events_tracing,
            disable_color_tracing: self.disable_color_tracing,
        })
    }
}

impl TryFrom<CLIArgs> for Config {
    type Error = String;

    fn try_from(args: CLIArgs) -> Result<Self, Self::Error> {
        args.validate()?;

        // Shell completion does not need a target.
        let target = if args.auto_complete_shell.is_some() && args.bucket.is_none() {
            ScanTarget::new("", "")
        } else {
            args.build_target()?
        };

        Ok(Config {
            target,
            skip_listing: args.no_list,
            price_per_gb_month: args.price_per_gb_month,
            max_keys: args.max_keys,
            client_config: Some(args.build_client_config()),
            tracing_config: args.build_tracing_config(),
            auto_complete_shell: args.auto_complete_shell,
        })
    }
}
