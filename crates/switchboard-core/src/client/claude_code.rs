//! Claude Code assembler: `settings.json`, `CLAUDE.md` and installed skills.

use serde_json::{Map, Value, json};

use super::{
    Artifact, AssemblyInput, ClientAssembler, TaggedMcpEncoding, add_prompt_file, pretty_json,
};
use crate::skills::{render_skill_md, skill_dir_name};
use crate::types::AppType;

pub const SETTINGS_SCHEMA_URL: &str = "https://json.schemastore.org/claude-code-settings.json";

/// Environment variables that all receive the provider's model id
const MODEL_ENV_VARS: [&str; 4] = [
    "ANTHROPIC_MODEL",
    "ANTHROPIC_DEFAULT_SONNET_MODEL",
    "ANTHROPIC_DEFAULT_HAIKU_MODEL",
    "ANTHROPIC_DEFAULT_OPUS_MODEL",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct ClaudeCodeAssembler;

impl ClaudeCodeAssembler {
    /// Build the `settings.json` object.
    ///
    /// The `env` block only exists when a non-official provider is selected;
    /// `mcpServers` only when at least one server is selected.
    pub fn settings(input: &AssemblyInput<'_>) -> Value {
        let mut settings = Map::new();
        settings.insert("$schema".to_string(), json!(SETTINGS_SCHEMA_URL));

        if let Some(provider) = input.credential_provider() {
            let mut env = Map::new();
            if let Some(key) = provider.api_key() {
                env.insert("ANTHROPIC_AUTH_TOKEN".to_string(), json!(key));
            }
            if let Some(url) = provider.effective_base_url() {
                env.insert("ANTHROPIC_BASE_URL".to_string(), json!(url));
            }
            let model = provider.model();
            if let Some(model) = model {
                for var in MODEL_ENV_VARS {
                    env.insert(var.to_string(), json!(model));
                }
            }
            settings.insert("env".to_string(), Value::Object(env));
            if let Some(model) = model {
                settings.insert("model".to_string(), json!(model));
            }
        }

        settings.insert(
            "permissions".to_string(),
            json!({ "allow": ["*"], "deny": [] }),
        );

        let servers = TaggedMcpEncoding::render_servers(&input.mcp_servers);
        if !servers.is_empty() {
            settings.insert("mcpServers".to_string(), Value::Object(servers));
        }

        Value::Object(settings)
    }
}

impl ClientAssembler for ClaudeCodeAssembler {
    fn app(&self) -> AppType {
        AppType::Claude
    }

    fn config_file_name(&self) -> &'static str {
        "settings.json"
    }

    fn install_path(&self) -> &'static str {
        "~/.claude/settings.json"
    }

    fn assemble(&self, input: &AssemblyInput<'_>) -> Artifact {
        let mut artifact = Artifact::new(AppType::Claude);
        artifact.insert_text(self.config_file_name(), pretty_json(&Self::settings(input)));
        add_prompt_file(&mut artifact, input);
        for skill in &input.skills {
            artifact.insert_text(
                format!("skills/{}/SKILL.md", skill_dir_name(&skill.name)),
                render_skill_md(skill),
            );
        }
        artifact
    }
}
