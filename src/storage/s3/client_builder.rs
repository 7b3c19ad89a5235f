use std::time::Duration;

use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, ConfigLoader};
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};

use crate::config::{ClientConfig, DEFAULT_REGION};
use crate::types::S3Credentials;

const CREDENTIALS_PROVIDER_NAME: &str = "s3r";

impl ClientConfig {
    pub async fn create_client(&self) -> Client {
        let sdk_config = self.load_config().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(self.force_path_style);
        if let Some(endpoint_url) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Client::from_conf(builder.build())
    }

    async fn load_config(&self) -> aws_config::SdkConfig {
        let mut config_loader = aws_config::defaults(BehaviorVersion::latest());

        config_loader = self.load_config_credential(config_loader);
        config_loader = self.load_region(config_loader);
        config_loader = config_loader
            .retry_config(self.build_retry_config())
            .timeout_config(self.build_timeout_config());

        config_loader.load().await
    }

    fn load_config_credential(&self, mut config_loader: ConfigLoader) -> ConfigLoader {
        if let Some(profile_files) = self.build_profile_files() {
            config_loader = config_loader.profile_files(profile_files);
        }

        match &self.credential {
            S3Credentials::Profile(profile_name) => config_loader.profile_name(profile_name),
            S3Credentials::Credentials { access_keys } => {
                let credentials = Credentials::new(
                    access_keys.access_key.to_string(),
                    access_keys.secret_access_key.to_string(),
                    access_keys.session_token.clone(),
                    None,
                    CREDENTIALS_PROVIDER_NAME,
                );
                config_loader.credentials_provider(credentials)
            }
            S3Credentials::FromEnvironment => config_loader,
        }
    }

    // GetBucketLocation needs some region; fall back to the S3 home region.
    fn load_region(&self, config_loader: ConfigLoader) -> ConfigLoader {
        match &self.region {
            Some(region) => config_loader.region(Region::new(region.clone())),
            None => config_loader.region(
                RegionProviderChain::default_provider().or_else(Region::new(DEFAULT_REGION)),
            ),
        }
    }

    fn build_profile_files(&self) -> Option<EnvConfigFiles> {
        let location = &self.client_config_location;
        if location.aws_config_file.is_none() && location.aws_shared_credentials_file.is_none() {
            return None;
        }

        let mut builder = EnvConfigFiles::builder();
        builder = match &location.aws_config_file {
            Some(path) => builder.with_file(EnvConfigFileKind::Config, path),
            None => builder.include_default_config_file(true),
        };
        builder = match &location.aws_shared_credentials_file {
            Some(path) => builder.with_file(EnvConfigFileKind::Credentials, path),
            None => builder.include_default_credentials_file(true),
        };

        Some(builder.build())
    }

    fn build_retry_config(&self) -> RetryConfig {
        RetryConfig::standard()
            .with_max_attempts(self.retry_config.aws_max_attempts)
            .with_initial_backoff(Duration::from_millis(
                self.retry_config.initial_backoff_milliseconds,
            ))
    }

    fn build_timeout_config(&self) -> TimeoutConfig {
        let timeouts = &self.cli_timeout_config;

        let mut builder = TimeoutConfig::builder();
        builder
            .set_operation_timeout(timeouts.operation_timeout_milliseconds.map(Duration::from_millis))
            .set_operation_attempt_timeout(
                timeouts
                    .operation_attempt_timeout_milliseconds
                    .map(Duration::from_millis),
            )
            .set_connect_timeout(timeouts.connect_timeout_milliseconds.map(Duration::from_millis))
            .set_read_timeout(timeouts.read_timeout_milliseconds.map(Duration::from_millis));
        builder.build()
    }
}
