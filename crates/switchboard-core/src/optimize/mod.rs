//! AI-assisted prompt rewriting through an OpenAI-compatible chat endpoint.

mod history;
pub mod templates;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::OptimizerSettings;

pub use history::{OptimizeRun, history, save_run};
pub use templates::{TEMPLATES, Template};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizeAction {
    /// Rewrite a prompt
    Optimize,
    /// Refine an earlier rewrite using feedback
    Iterate,
    /// Score a prompt without rewriting it
    Evaluate,
}

impl TryFrom<&str> for OptimizeAction {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "optimize" => Ok(OptimizeAction::Optimize),
            "iterate" => Ok(OptimizeAction::Iterate),
            "evaluate" => Ok(OptimizeAction::Evaluate),
            _ => anyhow::bail!(
                "Invalid action: '{}'. Valid values: optimize, iterate, evaluate",
                value
            ),
        }
    }
}

/// Whether the prompt being optimized is a system or a user prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    #[default]
    System,
    User,
}

impl TryFrom<&str> for PromptMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "system" => Ok(PromptMode::System),
            "user" => Ok(PromptMode::User),
            _ => anyhow::bail!("Invalid mode: '{}'. Valid values: system, user", value),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("API key not configured: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Too many requests, try again later")]
    RateLimited,

    #[error("AI credits exhausted, top up your account")]
    QuotaExhausted,

    #[error("AI service error (HTTP {status})")]
    Gateway { status: u16 },

    #[error("AI service unreachable: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeRequest {
    pub action: OptimizeAction,
    pub prompt: String,
    /// Earlier rewrite, used by [`OptimizeAction::Iterate`]
    pub optimized_prompt: Option<String>,
    /// Variant of the `optimize/` family, `general` when unset
    pub template: Option<String>,
    pub mode: PromptMode,
    pub feedback: Option<String>,
}

impl OptimizeRequest {
    pub fn new(action: OptimizeAction, prompt: impl Into<String>) -> Self {
        Self {
            action,
            prompt: prompt.into(),
            optimized_prompt: None,
            template: None,
            mode: PromptMode::System,
            feedback: None,
        }
    }

    /// Template id chosen from the action, mode and requested variant
    pub fn template_id(&self) -> String {
        match (self.action, self.mode) {
            (OptimizeAction::Evaluate, _) => "evaluate/analyze".to_string(),
            (OptimizeAction::Iterate, _) => "iterate/refine".to_string(),
            (OptimizeAction::Optimize, PromptMode::User) => "user-optimize/general".to_string(),
            (OptimizeAction::Optimize, PromptMode::System) => format!(
                "optimize/{}",
                self.template
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .unwrap_or("general")
            ),
        }
    }

    /// The chat messages sent to the model
    pub fn messages(&self) -> Result<Vec<ChatMessage>, OptimizeError> {
        if self.prompt.trim().is_empty() {
            return Err(OptimizeError::EmptyPrompt);
        }
        let id = self.template_id();
        let template = templates::find(&id).ok_or(OptimizeError::UnknownTemplate(id))?;
        Ok(vec![
            ChatMessage::new("system", template.system_message()),
            ChatMessage::new(
                "user",
                template.user_message(
                    &self.prompt,
                    self.optimized_prompt.as_deref(),
                    self.feedback.as_deref(),
                ),
            ),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Model output: a rewrite in `result`, or a report in `analysis` for
/// evaluations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizeOutcome {
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl fmt::Display for OptimizeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.analysis.as_deref().unwrap_or(&self.result))
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
}

pub struct PromptOptimizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for PromptOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptOptimizer")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl PromptOptimizer {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, OptimizeError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build from settings, reading the key from the configured variable.
    pub fn from_settings(settings: &OptimizerSettings) -> Result<Self, OptimizeError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| OptimizeError::MissingApiKey(settings.api_key_env.clone()))?;
        Self::new(&settings.endpoint, &settings.model, api_key)
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint)
    }

    pub async fn run(&self, request: &OptimizeRequest) -> Result<OptimizeOutcome, OptimizeError> {
        let messages = request.messages()?;
        tracing::debug!("Running {} with {}", request.template_id(), self.model);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "stream": false,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                429 => OptimizeError::RateLimited,
                402 => OptimizeError::QuotaExhausted,
                code => {
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!("AI gateway error: HTTP {} {}", code, body);
                    OptimizeError::Gateway { status: code }
                }
            });
        }

        let completion: CompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .map(|message| message.content)
            .unwrap_or_default();

        Ok(match request.action {
            OptimizeAction::Evaluate => OptimizeOutcome {
                result: String::new(),
                analysis: Some(content),
            },
            _ => OptimizeOutcome {
                result: content,
                analysis: None,
            },
        })
    }
}
