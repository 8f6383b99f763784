//! Settings schema. Every field has a default, so an empty file is valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where record collections are stored; platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Partition all records are read from and written to
    pub user: String,
    /// Origin share links are generated under
    pub share_origin: String,
    pub probe: ProbeSettings,
    pub optimizer: OptimizerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            user: "local".to_string(),
            share_origin: "http://localhost:8080".to_string(),
            probe: ProbeSettings::default(),
            optimizer: OptimizerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub timeout_secs: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl ProbeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Gateway root; requests go to `<endpoint>/v1/chat/completions`
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the gateway key
    pub api_key_env: String,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api".to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        UserId::new(self.user.as_str())?;
        url::Url::parse(&self.share_origin)
            .map_err(|e| anyhow::anyhow!("Invalid share_origin '{}': {}", self.share_origin, e))?;
        url::Url::parse(&self.optimizer.endpoint).map_err(|e| {
            anyhow::anyhow!(
                "Invalid optimizer endpoint '{}': {}",
                self.optimizer.endpoint,
                e
            )
        })?;
        if self.probe.timeout_secs == 0 {
            anyhow::bail!("probe.timeout_secs must be greater than 0");
        }
        if self.optimizer.api_key_env.trim().is_empty() {
            anyhow::bail!("optimizer.api_key_env cannot be empty");
        }
        Ok(())
    }

    pub fn user_id(&self) -> anyhow::Result<UserId> {
        UserId::new(self.user.as_str())
    }

    /// The configured data directory, or the platform default
    pub fn resolved_data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => super::default_data_dir(),
        }
    }
}
