//! CLI settings persistence
//!
//! Remembers the last profile, region and role used so they need not be
//! passed on every invocation. Stored in the platform-specific config folder:
//! - Linux: ~/.config/aws-session/settings.json
//! - Windows: %APPDATA%\aws-session\aws-session\config\settings.json
//! - macOS: ~/Library/Application Support/org.aws-session.aws-session/settings.json

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings that persist between invocations
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// Last used AWS profile name
    #[serde(default)]
    pub last_profile: Option<String>,

    /// Last used region
    #[serde(default)]
    pub last_region: Option<String>,

    /// Last assumed role ARN
    #[serde(default)]
    pub last_role_arn: Option<String>,
}

impl Settings {
    /// Load settings from the default location, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    /// Load settings from `path`, returning defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {:?}", path))?;

        tracing::info!(
            "Loaded settings: profile={:?}, region={:?}, role_arn={:?}",
            settings.last_profile,
            settings.last_region,
            settings.last_role_arn
        );

        Ok(settings)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::settings_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        tracing::debug!("Saved settings to {:?}", path);

        Ok(())
    }

    /// Get the path to the settings file
    pub fn settings_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "aws-session", "aws-session")
            .context("Failed to determine settings directory")?;

        Ok(proj_dirs.config_dir().join("settings.json"))
    }

    /// Replace the stored values; unset ones are forgotten so saved combinations stay consistent
    pub fn remember(&mut self, profile: Option<&str>, region: Option<&str>, role_arn: Option<&str>) {
        self.last_profile = profile.map(|s| s.to_string());
        self.last_region = region.map(|s| s.to_string());
        self.last_role_arn = role_arn.map(|s| s.to_string());
    }
}
