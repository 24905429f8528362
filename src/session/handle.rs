//! Resolved AWS session handle

use std::fmt;

use aws_config::{AppName, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use aws_smithy_async::rt::sleep::default_async_sleep;
use aws_smithy_async::time::SharedTimeSource;
use aws_smithy_types::error::display::DisplayErrorContext;

use super::handlers::{HandlerList, UserAgentHandler, APP_NAME};
use super::SessionError;

/// Where a session's credentials come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// The default credential chain
    Ambient,
    /// A named profile in the shared config files
    Profile(String),
    /// Temporary credentials from assuming a role
    AssumedRole { role_arn: String },
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Ambient => write!(f, "default credential chain"),
            CredentialSource::Profile(name) => write!(f, "profile '{}'", name),
            CredentialSource::AssumedRole { role_arn } => write!(f, "assumed role {}", role_arn),
        }
    }
}

/// An authenticated AWS session
///
/// Wraps the loaded [`SdkConfig`] together with the handler chain that every
/// client built from it receives. The config carries the tool's app name, so
/// clients built straight from [`Session::config`] identify the tool too.
/// Credentials are not fetched until [`Session::credentials`] runs or a client
/// signs its first request.
#[derive(Debug, Clone)]
pub struct Session {
    config: SdkConfig,
    source: CredentialSource,
    build_handlers: HandlerList,
    verbose_errors: bool,
}

impl Session {
    /// Wrap a loaded configuration, tagging it with the user-agent handler
    pub fn new(config: SdkConfig, source: CredentialSource, verbose_errors: bool) -> Self {
        let mut build_handlers = HandlerList::new();
        build_handlers.push_back_named(UserAgentHandler::named());

        Self {
            config: with_session_defaults(config),
            source,
            build_handlers,
            verbose_errors,
        }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn region(&self) -> Option<&Region> {
        self.config.region()
    }

    pub fn credential_source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn build_handlers(&self) -> &HandlerList {
        &self.build_handlers
    }

    pub fn verbose_errors(&self) -> bool {
        self.verbose_errors
    }

    /// Resolve credentials through the session's provider.
    ///
    /// This is where credential-chain failures surface. With verbose errors on,
    /// the message includes every provider's reason for failing.
    pub async fn credentials(&self) -> Result<Credentials, SessionError> {
        let provider = self
            .config
            .credentials_provider()
            .ok_or(SessionError::MissingCredentialsProvider)?;

        provider.provide_credentials().await.map_err(|err| {
            let message = if self.verbose_errors {
                DisplayErrorContext(&err).to_string()
            } else {
                err.to_string()
            };
            tracing::debug!("Credential resolution failed for {}: {}", self.source, message);
            SessionError::CredentialResolution(message)
        })
    }

    /// STS client with the session's handler chain applied
    pub fn sts_client(&self) -> aws_sdk_sts::Client {
        let mut builder = aws_sdk_sts::config::Builder::from(&self.config);
        for interceptor in self.build_handlers.interceptors() {
            builder.push_interceptor(interceptor);
        }
        aws_sdk_sts::Client::from_conf(builder.build())
    }

    /// S3 client with the session's handler chain applied
    pub fn s3_client(&self) -> aws_sdk_s3::Client {
        let mut builder = aws_sdk_s3::config::Builder::from(&self.config);
        for interceptor in self.build_handlers.interceptors() {
            builder.push_interceptor(interceptor);
        }
        aws_sdk_s3::Client::from_conf(builder.build())
    }
}

/// Fill in what hand-assembled configs tend to lack.
///
/// The app name tags every request built from the config. STS role
/// assumption requires a time source, and a sleep implementation lets its
/// client retry; both are only set when missing.
fn with_session_defaults(config: SdkConfig) -> SdkConfig {
    let needs_app_name = config.app_name().is_none();
    let needs_time_source = config.time_source().is_none();
    let needs_sleep = config.sleep_impl().is_none();
    if !(needs_app_name || needs_time_source || needs_sleep) {
        return config;
    }

    let mut builder = config.to_builder();
    if needs_app_name {
        if let Ok(app_name) = AppName::new(APP_NAME) {
            builder.set_app_name(Some(app_name));
        }
    }
    if needs_time_source {
        builder.set_time_source(Some(SharedTimeSource::default()));
    }
    if needs_sleep {
        builder.set_sleep_impl(default_async_sleep());
    }
    builder.build()
}
