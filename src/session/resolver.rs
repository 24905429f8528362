//! Credential resolution façade
//!
//! Entry points build sessions from the default chain (optionally pinned to a
//! region), a named profile (likewise), or an assumed role. All of them go
//! through the same construction path, which tags the session with the
//! user-agent handler. Nothing is cached between calls.

use std::time::Duration;

use aws_config::sts::AssumeRoleProvider;
use aws_config::Region;
use aws_credential_types::provider::SharedCredentialsProvider;
use tracing::{debug, info};

use super::handle::{CredentialSource, Session};
use super::loader::{AwsConfigLoader, ConfigLoader, LoadRequest};
use super::SessionError;

const DEFAULT_SESSION_CONTEXT: &str = "error creating default session";

/// Options shared by every session a resolver builds
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Report every credential provider's failure reason, not just the last one
    pub verbose_errors: bool,
    /// Session name for role assumption; the SDK generates one when unset
    pub role_session_name: Option<String>,
    /// External ID required by the role's trust policy, if any
    pub external_id: Option<String>,
    /// Lifetime of assumed-role credentials; the SDK default applies when unset
    pub role_session_duration: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            verbose_errors: true,
            role_session_name: None,
            external_id: None,
            role_session_duration: None,
        }
    }
}

/// Builds authenticated [`Session`]s
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver<L = AwsConfigLoader> {
    loader: L,
    options: SessionOptions,
}

impl CredentialResolver<AwsConfigLoader> {
    /// Resolver backed by the standard `aws-config` provider chains
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: ConfigLoader> CredentialResolver<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            options: SessionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Session from the default profile and the default credential chain
    pub async fn default_session(&self) -> Result<Session, SessionError> {
        debug!("Creating default session");
        self.build(LoadRequest::new(), CredentialSource::Ambient).await
    }

    /// Default session pinned to `region`, bypassing region discovery.
    ///
    /// The region is not validated; an unknown region fails when a request is sent.
    pub async fn default_with_region(&self, region: &str) -> Result<Session, SessionError> {
        debug!("Creating default session in region {}", region);
        self.build(LoadRequest::new().region(region), CredentialSource::Ambient)
            .await
    }

    /// Session from a named profile.
    ///
    /// A missing or malformed profile is not an error here; it surfaces when
    /// credentials are first resolved.
    pub async fn from_profile(&self, name: &str) -> Result<Session, SessionError> {
        debug!("Creating session from profile {}", name);
        self.build(
            LoadRequest::new().profile(name),
            CredentialSource::Profile(name.to_string()),
        )
        .await
    }

    /// Session from a named profile, pinned to `region` instead of the profile's own region
    pub async fn from_profile_with_region(
        &self,
        name: &str,
        region: &str,
    ) -> Result<Session, SessionError> {
        debug!("Creating session from profile {} in region {}", name, region);
        self.build(
            LoadRequest::new().profile(name).region(region),
            CredentialSource::Profile(name.to_string()),
        )
        .await
    }

    /// Session whose credentials come from assuming `role_arn`, pinned to `region`.
    ///
    /// The default session authorizes the `AssumeRole` call. The derived
    /// credentials are refreshed by the SDK's identity cache as they expire.
    pub async fn from_role(&self, role_arn: &str, region: &str) -> Result<Session, SessionError> {
        let default_session = self
            .default_session()
            .await
            .map_err(|err| SessionError::construction(DEFAULT_SESSION_CONTEXT, err))?;

        let base_provider = default_session.config().credentials_provider().ok_or_else(|| {
            SessionError::construction(
                DEFAULT_SESSION_CONTEXT,
                SessionError::MissingCredentialsProvider,
            )
        })?;

        info!("Assuming role {} in region {}", role_arn, region);
        let provider = self
            .assume_role_provider(&default_session, role_arn, region, base_provider)
            .await;

        self.build(
            LoadRequest::new()
                .region(region)
                .credentials_provider(SharedCredentialsProvider::new(provider)),
            CredentialSource::AssumedRole {
                role_arn: role_arn.to_string(),
            },
        )
        .await
    }

    async fn assume_role_provider(
        &self,
        default_session: &Session,
        role_arn: &str,
        region: &str,
        base_provider: SharedCredentialsProvider,
    ) -> AssumeRoleProvider {
        let mut builder = AssumeRoleProvider::builder(role_arn)
            .configure(default_session.config())
            .region(Region::new(region.to_string()));

        if let Some(name) = &self.options.role_session_name {
            builder = builder.session_name(name);
        }
        if let Some(external_id) = &self.options.external_id {
            builder = builder.external_id(external_id);
        }
        if let Some(duration) = self.options.role_session_duration {
            builder = builder.session_length(duration);
        }

        builder.build_from_provider(base_provider).await
    }

    async fn build(
        &self,
        request: LoadRequest,
        source: CredentialSource,
    ) -> Result<Session, SessionError> {
        let config = self.loader.load(request).await?;
        let session = Session::new(config, source, self.options.verbose_errors);

        debug!(
            "Session ready: source={}, region={:?}",
            session.credential_source(),
            session.region().map(|r| r.as_ref())
        );
        Ok(session)
    }
}
