//! Configuration loading
//!
//! The resolver never talks to `aws-config` directly. It describes what it
//! needs as a [`LoadRequest`] and hands it to a [`ConfigLoader`], which keeps
//! SDK discovery out of process-wide state and lets callers substitute their
//! own configuration source.

use std::future::Future;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;

use super::SessionError;

/// What a session needs from configuration discovery
#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    /// Named profile in the shared config files; `None` means the default profile
    pub profile: Option<String>,
    /// Explicit region; `None` lets discovery pick one
    pub region: Option<String>,
    /// Explicit credentials; `None` uses the default credential chain
    pub credentials_provider: Option<SharedCredentialsProvider>,
}

impl LoadRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn credentials_provider(mut self, provider: SharedCredentialsProvider) -> Self {
        self.credentials_provider = Some(provider);
        self
    }
}

/// Produces an [`SdkConfig`] for a [`LoadRequest`]
pub trait ConfigLoader: Send + Sync {
    fn load(
        &self,
        request: LoadRequest,
    ) -> impl Future<Output = Result<SdkConfig, SessionError>> + Send;
}

/// Loads configuration through the standard `aws-config` provider chains
///
/// Environment variables, `~/.aws/config`, `~/.aws/credentials`, SSO, web
/// identity and container/instance metadata are all consulted by the SDK.
/// Nothing is resolved here: credentials are fetched on first use.
#[derive(Debug, Clone, Default)]
pub struct AwsConfigLoader;

impl ConfigLoader for AwsConfigLoader {
    async fn load(&self, request: LoadRequest) -> Result<SdkConfig, SessionError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = request.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = request.region {
            loader = loader.region(Region::new(region));
        }
        if let Some(provider) = request.credentials_provider {
            loader = loader.credentials_provider(provider);
        }

        Ok(loader.load().await)
    }
}

/// Serves a fixed base configuration, overlaying the request's region and credentials
///
/// Useful when the configuration is assembled by hand, e.g. with a custom HTTP
/// client or static keys. Profile names are ignored since no shared config
/// files are read.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    base: SdkConfig,
}

impl StaticConfigLoader {
    pub fn new(base: SdkConfig) -> Self {
        Self { base }
    }
}

impl ConfigLoader for StaticConfigLoader {
    async fn load(&self, request: LoadRequest) -> Result<SdkConfig, SessionError> {
        let mut builder = self.base.to_builder();

        if let Some(region) = request.region {
            builder.set_region(Some(Region::new(region)));
        }
        if let Some(provider) = request.credentials_provider {
            builder.set_credentials_provider(Some(provider));
        }

        Ok(builder.build())
    }
}
