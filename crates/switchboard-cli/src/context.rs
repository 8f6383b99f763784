//! Settings, store and user resolved once per invocation.

use std::path::PathBuf;

use anyhow::Context;
use switchboard_core::config::{Settings, SettingsStore};
use switchboard_core::store::FileStore;
use switchboard_core::types::UserId;

pub struct AppContext {
    settings: Settings,
    settings_store: SettingsStore,
    store: FileStore,
    user: UserId,
}

impl AppContext {
    /// Load settings, then apply command-line overrides
    pub fn load(
        config: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        user: Option<String>,
    ) -> anyhow::Result<Self> {
        let settings_store = match config {
            Some(path) => SettingsStore::from_path(path),
            None => SettingsStore::from_default_location()?,
        };
        let mut settings = settings_store.load()?;
        if let Some(dir) = data_dir {
            settings.data_dir = Some(dir);
        }
        if let Some(user) = user {
            settings.user = user;
        }
        settings.validate().context("Invalid settings")?;

        let store = FileStore::new(settings.resolved_data_dir()?);
        let user = settings.user_id()?;
        tracing::debug!(
            "Using data dir {} as user {}",
            store.root().display(),
            user
        );

        Ok(Self {
            settings,
            settings_store,
            store,
            user,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_store(&self) -> &SettingsStore {
        &self.settings_store
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn user(&self) -> UserId {
        self.user.clone()
    }
}
