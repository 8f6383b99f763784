//! Loading and saving switchboard.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{SETTINGS_FILE_NAME, Settings, default_config_dir, parser};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store at the platform config location
    pub fn from_default_location() -> anyhow::Result<Self> {
        Ok(Self::from_path(default_config_dir()?.join(SETTINGS_FILE_NAME)))
    }

    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means defaults
    pub fn load(&self) -> anyhow::Result<Settings> {
        if !self.path.exists() {
            tracing::debug!("No settings at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }
        parser::parse_settings(&self.path)
    }

    pub fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        let content = parser::to_toml(settings)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))?;
        Ok(())
    }
}
