//! Command line interface

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;

use crate::session::{ConfigLoader, CredentialResolver, Session};
use crate::settings::Settings;

#[derive(Debug, Clone, Parser)]
#[command(name = "aws-session", version, about = "Resolve AWS sessions from the default chain, a profile or an assumed role", long_about = None)]
pub struct Cli {
    #[arg(short = 'p', long, global = true, help = "AWS profile name")]
    pub profile: Option<String>,

    #[arg(short = 'r', long, global = true, help = "AWS region")]
    pub region: Option<String>,

    #[arg(long, global = true, help = "ARN of a role to assume (requires a region)")]
    pub role_arn: Option<String>,

    #[arg(long, global = true, help = "Ignore saved settings")]
    pub no_settings: bool,

    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    #[command(about = "Print the identity the resolved session authenticates as")]
    Whoami,
    #[command(about = "Print the resolved session without contacting AWS")]
    Show,
    #[command(about = "Save the given profile, region and role as defaults")]
    Save,
}

/// Which resolver entry point a set of flags selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    Default,
    DefaultWithRegion(String),
    FromProfile(String),
    FromProfileWithRegion { profile: String, region: String },
    FromRole { role_arn: String, region: String },
}

impl EntryPoint {
    /// With nothing set the default chain is used.
    ///
    /// A role is assumed from the default chain, so it cannot be combined with a profile.
    pub fn select(
        profile: Option<&str>,
        region: Option<&str>,
        role_arn: Option<&str>,
    ) -> Result<Self> {
        match (role_arn, profile, region) {
            (Some(_), Some(_), _) => bail!("--profile cannot be combined with --role-arn"),
            (Some(_), None, None) => bail!("--role-arn requires --region"),
            (Some(role_arn), None, Some(region)) => Ok(EntryPoint::FromRole {
                role_arn: role_arn.to_string(),
                region: region.to_string(),
            }),
            (None, Some(profile), Some(region)) => Ok(EntryPoint::FromProfileWithRegion {
                profile: profile.to_string(),
                region: region.to_string(),
            }),
            (None, Some(profile), None) => Ok(EntryPoint::FromProfile(profile.to_string())),
            (None, None, Some(region)) => Ok(EntryPoint::DefaultWithRegion(region.to_string())),
            (None, None, None) => Ok(EntryPoint::Default),
        }
    }

    pub async fn resolve<L: ConfigLoader>(&self, resolver: &CredentialResolver<L>) -> Result<Session> {
        let session = match self {
            EntryPoint::Default => resolver.default_session().await,
            EntryPoint::DefaultWithRegion(region) => resolver.default_with_region(region).await,
            EntryPoint::FromProfile(profile) => resolver.from_profile(profile).await,
            EntryPoint::FromProfileWithRegion { profile, region } => {
                resolver.from_profile_with_region(profile, region).await
            }
            EntryPoint::FromRole { role_arn, region } => resolver.from_role(role_arn, region).await,
        };
        Ok(session?)
    }
}

impl Cli {
    fn has_explicit_flags(&self) -> bool {
        self.profile.is_some() || self.region.is_some() || self.role_arn.is_some()
    }

    /// Explicit flags if any were given, saved settings otherwise.
    ///
    /// The two sources are never mixed: a saved role must not override an
    /// explicit profile, nor a saved profile swallow an explicit region.
    fn effective(&self, settings: &Settings) -> (Option<String>, Option<String>, Option<String>) {
        if self.no_settings || self.has_explicit_flags() {
            return (self.profile.clone(), self.region.clone(), self.role_arn.clone());
        }
        (
            settings.last_profile.clone(),
            settings.last_region.clone(),
            settings.last_role_arn.clone(),
        )
    }

    pub fn entry_point(&self, settings: &Settings) -> Result<EntryPoint> {
        let (profile, region, role_arn) = self.effective(settings);
        EntryPoint::select(profile.as_deref(), region.as_deref(), role_arn.as_deref())
    }

    pub async fn execute(self) -> Result<()> {
        let mut settings = if self.no_settings {
            Settings::default()
        } else {
            Settings::load()?
        };

        match self.command.unwrap_or(Commands::Whoami) {
            Commands::Save => {
                EntryPoint::select(
                    self.profile.as_deref(),
                    self.region.as_deref(),
                    self.role_arn.as_deref(),
                )?;
                settings.remember(
                    self.profile.as_deref(),
                    self.region.as_deref(),
                    self.role_arn.as_deref(),
                );
                let path = settings.save()?;
                println!("Saved settings to {}", path.display());
                Ok(())
            }
            Commands::Show => {
                let session = self.entry_point(&settings)?.resolve(&CredentialResolver::new()).await?;
                print_session(&session);
                Ok(())
            }
            Commands::Whoami => {
                let session = self.entry_point(&settings)?.resolve(&CredentialResolver::new()).await?;
                whoami(&session).await
            }
        }
    }
}

fn print_session(session: &Session) {
    println!("Credentials: {}", session.credential_source());
    println!(
        "Region:      {}",
        session.region().map(|r| r.as_ref()).unwrap_or("<unset>")
    );
    println!("Handlers:    {}", session.build_handlers().names().join(", "));
}

async fn whoami(session: &Session) -> Result<()> {
    info!("Calling AWS STS GetCallerIdentity");

    let identity = session
        .sts_client()
        .get_caller_identity()
        .send()
        .await
        .context("Failed to get caller identity")?;

    println!("Account: {}", identity.account().unwrap_or_default());
    println!("Arn:     {}", identity.arn().unwrap_or_default());
    println!("UserId:  {}", identity.user_id().unwrap_or_default());
    Ok(())
}
