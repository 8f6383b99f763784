//! MCP server descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::types::AppType;

/// Transport types for MCP servers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Local subprocess speaking over stdin/stdout (default)
    #[default]
    Stdio,
    /// Streamable HTTP endpoint
    Http,
    /// Server-sent events endpoint
    Sse,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Stdio => "stdio",
            TransportType::Http => "http",
            TransportType::Sse => "sse",
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, TransportType::Stdio)
    }
}

impl TryFrom<&str> for TransportType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "stdio" => Ok(TransportType::Stdio),
            "http" => Ok(TransportType::Http),
            "sse" => Ok(TransportType::Sse),
            _ => anyhow::bail!("Invalid transport: '{}'. Valid values: stdio, http, sse", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpServer {
    /// Also the key the server is written under in every tool config
    pub name: String,
    #[serde(default)]
    pub transport_type: TransportType,
    /// STDIO: executable to launch
    #[serde(default)]
    pub command: Option<String>,
    /// HTTP/SSE: endpoint
    #[serde(default)]
    pub url: Option<String>,
    /// STDIO: ordered arguments
    #[serde(default)]
    pub args: Vec<String>,
    /// STDIO: environment for the subprocess
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Tools this server is emitted for
    #[serde(default = "default_bindings")]
    pub app_bindings: Vec<AppType>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_bindings() -> Vec<AppType> {
    vec![AppType::Claude]
}

fn default_enabled() -> bool {
    true
}

impl McpServer {
    pub fn stdio(
        name: impl Into<String>,
        command: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            transport_type: TransportType::Stdio,
            command: Some(command.into()),
            url: None,
            args: args.into_iter().map(Into::into).collect(),
            env: BTreeMap::new(),
            app_bindings: default_bindings(),
            enabled: true,
        }
    }

    pub fn remote(
        name: impl Into<String>,
        transport: TransportType,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            transport_type: transport,
            command: None,
            url: Some(url.into()),
            args: Vec::new(),
            env: BTreeMap::new(),
            app_bindings: default_bindings(),
            enabled: true,
        }
    }

    pub fn with_bindings(mut self, apps: impl IntoIterator<Item = AppType>) -> Self {
        self.app_bindings.clear();
        for app in apps {
            if !self.app_bindings.contains(&app) {
                self.app_bindings.push(app);
            }
        }
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn is_bound_to(&self, app: AppType) -> bool {
        self.app_bindings.contains(&app)
    }

    /// Command or empty string; incomplete stdio servers are still exported
    pub fn command_or_empty(&self) -> &str {
        self.command.as_deref().unwrap_or_default()
    }

    pub fn url_or_empty(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// Validate the descriptor for create/update.
    ///
    /// Assemblers do not call this: an incomplete server is exported as-is.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("MCP server name cannot be empty");
        }
        match self.transport_type {
            TransportType::Stdio => {
                if self.command_or_empty().trim().is_empty() {
                    anyhow::bail!("Command is required for stdio transport");
                }
            }
            TransportType::Http | TransportType::Sse => {
                if self.url_or_empty().trim().is_empty() {
                    anyhow::bail!("URL is required for {} transport", self.transport_type.as_str());
                }
            }
        }
        Ok(())
    }
}

impl Entity for McpServer {
    const COLLECTION: &'static str = "mcp_servers";

    fn display_name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> anyhow::Result<()> {
        self.validate()
    }
}
