//! Provider records: credentials and endpoint for one CLI tool.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Entity, Record};
use crate::types::AppType;

const PACKYCODE_BASE_URL: &str = "https://api.packycode.com";

/// How a provider authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// The tool's own login flow; nothing to configure
    Official,
    /// PackyCode relay with a fixed endpoint
    Packycode,
    /// Any endpoint and key
    Custom,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Official => "official",
            ProviderType::Packycode => "packycode",
            ProviderType::Custom => "custom",
        }
    }

    /// Base URL implied by this provider type, if it is not user supplied.
    pub fn derived_base_url(&self, app_type: AppType) -> Option<&'static str> {
        match self {
            ProviderType::Official => Some(match app_type {
                AppType::Claude => "https://api.anthropic.com",
                AppType::Codex => "https://api.openai.com/v1",
                AppType::Gemini => "https://generativelanguage.googleapis.com",
                AppType::OpenCode => "https://api.openai.com/v1",
            }),
            ProviderType::Packycode => Some(PACKYCODE_BASE_URL),
            ProviderType::Custom => None,
        }
    }
}

impl TryFrom<&str> for ProviderType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "official" => Ok(ProviderType::Official),
            "packycode" => Ok(ProviderType::Packycode),
            "custom" => Ok(ProviderType::Custom),
            _ => anyhow::bail!(
                "Invalid provider type: '{}'. Valid values: official, packycode, custom",
                value
            ),
        }
    }
}

/// Free-form model settings attached to a provider.
///
/// Only the `model` key is interpreted; everything else is carried verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelConfig(pub Value);

impl ModelConfig {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self(serde_json::json!({ "model": model.into() }))
    }

    /// The configured model id, when it is a non-empty string
    pub fn model(&self) -> Option<&str> {
        self.0
            .get("model")
            .and_then(Value::as_str)
            .filter(|model| !model.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub provider_type: ProviderType,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    pub app_type: AppType,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub model_config: Option<ModelConfig>,
}

fn default_enabled() -> bool {
    true
}

impl Provider {
    /// Create a provider with the base URL its type implies.
    pub fn new(name: impl Into<String>, provider_type: ProviderType, app_type: AppType) -> Self {
        Self {
            name: name.into(),
            provider_type,
            api_key: None,
            base_url: provider_type.derived_base_url(app_type).map(str::to_string),
            app_type,
            enabled: true,
            sort_order: 0,
            model_config: None,
        }
    }

    /// Switch provider type or app type, re-deriving the base URL when it is
    /// not user supplied.
    pub fn retarget(&mut self, provider_type: ProviderType, app_type: AppType) {
        self.provider_type = provider_type;
        self.app_type = app_type;
        if let Some(url) = provider_type.derived_base_url(app_type) {
            self.base_url = Some(url.to_string());
        }
    }

    /// The base URL in effect: derived for official/packycode, stored for custom.
    pub fn effective_base_url(&self) -> Option<&str> {
        self.provider_type
            .derived_base_url(self.app_type)
            .or(self.base_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Whether assemblers embed this provider's credentials into the tool config
    pub fn embeds_credentials(&self) -> bool {
        self.provider_type != ProviderType::Official
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn model(&self) -> Option<&str> {
        self.model_config.as_ref().and_then(ModelConfig::model)
    }

    /// Copy for the "duplicate" action: suffixed name, placed at `sort_order`.
    pub fn duplicate(&self, sort_order: i64) -> Self {
        Self {
            name: format!("{} (copy)", self.name),
            sort_order,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Provider name cannot be empty");
        }
        if self.provider_type == ProviderType::Custom
            && let Some(url) = self.base_url.as_deref().filter(|url| !url.is_empty())
        {
            url::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("Invalid base URL '{}': {}", url, e))?;
        }
        Ok(())
    }
}

impl Entity for Provider {
    const COLLECTION: &'static str = "providers";

    fn display_name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> anyhow::Result<()> {
        self.validate()
    }

    fn sort_records(records: &mut [Record<Self>]) {
        records.sort_by_key(|record| record.data.sort_order);
    }
}
