//! Per-tool configuration assemblers.
//!
//! Each supported CLI gets one [`ClientAssembler`] that turns the records
//! selected for it into that tool's native files. Assemblers are total: missing
//! providers, prompts or servers shrink the output, they never fail.

pub mod claude_code;
pub mod codex;
pub mod gemini_cli;
pub mod mcp_json;
pub mod opencode;

use serde::Serialize;

use crate::model::{McpServer, Prompt, Provider, Skill};
use crate::types::AppType;

pub use claude_code::ClaudeCodeAssembler;
pub use codex::{CodexAssembler, CodexMcpEncoding};
pub use gemini_cli::GeminiCliAssembler;
pub use mcp_json::TaggedMcpEncoding;
pub use opencode::OpenCodeAssembler;

/// Content of one generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactContent {
    Text(String),
    Binary(Vec<u8>),
}

impl ArtifactContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ArtifactContent::Text(text) => text.as_bytes(),
            ArtifactContent::Binary(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArtifactContent::Text(text) => Some(text),
            ArtifactContent::Binary(_) => None,
        }
    }
}

/// The files produced by one assembly pass, keyed by relative path.
///
/// Paths keep the order they were first added in; adding a path twice
/// replaces the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    app: AppType,
    files: Vec<(String, ArtifactContent)>,
}

impl Artifact {
    pub fn new(app: AppType) -> Self {
        Self {
            app,
            files: Vec::new(),
        }
    }

    pub fn app(&self) -> AppType {
        self.app
    }

    pub fn insert(&mut self, path: impl Into<String>, content: ArtifactContent) {
        let path = path.into();
        match self.files.iter_mut().find(|(existing, _)| *existing == path) {
            Some((_, slot)) => *slot = content,
            None => self.files.push((path, content)),
        }
    }

    pub fn insert_text(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.insert(path, ArtifactContent::Text(text.into()));
    }

    pub fn get(&self, path: &str) -> Option<&ArtifactContent> {
        self.files
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, content)| content)
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(ArtifactContent::as_text)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(path, _)| path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArtifactContent)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_str(), content))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Records selected for one tool, in input order.
#[derive(Debug, Clone)]
pub struct AssemblyInput<'a> {
    pub app: AppType,
    pub providers: Vec<&'a Provider>,
    pub mcp_servers: Vec<&'a McpServer>,
    pub prompt: Option<&'a Prompt>,
    pub skills: Vec<&'a Skill>,
}

impl<'a> AssemblyInput<'a> {
    /// Apply the export selection rules for `app`:
    ///
    /// - servers that are enabled and bound to `app`
    /// - providers that are enabled and typed `app`
    /// - the first active prompt targeting `app`'s instruction file
    /// - installed skills
    pub fn select(
        app: AppType,
        providers: &'a [Provider],
        mcp_servers: &'a [McpServer],
        prompts: &'a [Prompt],
        skills: &'a [Skill],
    ) -> Self {
        let target = app.prompt_file();
        Self {
            app,
            providers: providers
                .iter()
                .filter(|p| p.enabled && p.app_type == app)
                .collect(),
            mcp_servers: mcp_servers
                .iter()
                .filter(|s| s.enabled && s.is_bound_to(app))
                .collect(),
            prompt: prompts
                .iter()
                .find(|p| p.is_active && p.target_file == target),
            skills: skills.iter().filter(|s| s.installed).collect(),
        }
    }

    /// The first selected provider whose credentials get embedded
    pub fn credential_provider(&self) -> Option<&'a Provider> {
        self.providers
            .iter()
            .copied()
            .find(|provider| provider.embeds_credentials())
    }

    pub fn stats(&self) -> AppStats {
        AppStats {
            app: self.app,
            mcp_servers: self.mcp_servers.len(),
            providers: self.providers.len(),
            skills: self.skills.len(),
            has_prompt: self.prompt.is_some(),
        }
    }
}

/// Counts shown next to each export target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppStats {
    pub app: AppType,
    pub mcp_servers: usize,
    pub providers: usize,
    pub skills: usize,
    pub has_prompt: bool,
}

/// Produces one tool's native configuration files
pub trait ClientAssembler: Send + Sync {
    fn app(&self) -> AppType;

    /// Name of the main configuration file inside the artifact
    fn config_file_name(&self) -> &'static str;

    /// Where the user is expected to place the main configuration file
    fn install_path(&self) -> &'static str;

    fn assemble(&self, input: &AssemblyInput<'_>) -> Artifact;
}

/// Get the assembler for a given tool
pub fn assembler_for(app: AppType) -> Box<dyn ClientAssembler> {
    match app {
        AppType::Claude => Box::new(ClaudeCodeAssembler),
        AppType::Codex => Box::new(CodexAssembler),
        AppType::Gemini => Box::new(GeminiCliAssembler),
        AppType::OpenCode => Box::new(OpenCodeAssembler),
    }
}

/// Copy the selected prompt, if any, to the tool's instruction file
pub(crate) fn add_prompt_file(artifact: &mut Artifact, input: &AssemblyInput<'_>) {
    if let Some(prompt) = input.prompt {
        artifact.insert_text(input.app.prompt_file().file_name(), prompt.content.clone());
    }
}

/// Serialize a JSON config the way exported files are written
pub(crate) fn pretty_json(value: &serde_json::Value) -> String {
    // Serializing a `Value` cannot fail: all map keys are strings.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProviderType, TransportType};
    use crate::types::TargetFile;

    #[test]
    fn test_select_applies_enabled_and_binding_rules() {
        let providers = vec![
            Provider::new("claude", ProviderType::Custom, AppType::Claude),
            Provider::new("codex", ProviderType::Custom, AppType::Codex),
            Provider {
                enabled: false,
                ..Provider::new("off", ProviderType::Custom, AppType::Claude)
            },
        ];
        let servers = vec![
            McpServer::stdio("a", "npx", ["a"]).with_bindings([AppType::Claude, AppType::Codex]),
            McpServer::remote("b", TransportType::Http, "https://b").with_bindings([AppType::Codex]),
            McpServer {
                enabled: false,
                ..McpServer::stdio("c", "npx", ["c"]).with_bindings([AppType::Claude])
            },
        ];
        let prompts = vec![
            Prompt::new("inactive", TargetFile::ClaudeMd, "x"),
            Prompt::new("codex", TargetFile::AgentsMd, "y").activated(),
            Prompt::new("first", TargetFile::ClaudeMd, "one").activated(),
            Prompt::new("second", TargetFile::ClaudeMd, "two").activated(),
        ];
        let skills = vec![Skill {
            installed: true,
            ..Skill::new("pdf", None)
        }];

        let input = AssemblyInput::select(AppType::Claude, &providers, &servers, &prompts, &skills);
        assert_eq!(input.providers.len(), 1);
        assert_eq!(input.providers[0].name, "claude");
        let names: Vec<&str> = input.mcp_servers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
        assert_eq!(input.prompt.map(|p| p.name.as_str()), Some("first"));
        assert_eq!(input.stats().skills, 1);

        let input = AssemblyInput::select(AppType::Codex, &providers, &servers, &prompts, &skills);
        let names: Vec<&str> = input.mcp_servers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(input.prompt.map(|p| p.name.as_str()), Some("codex"));
    }

    #[test]
    fn test_credential_provider_skips_official() {
        let providers = vec![
            Provider::new("login", ProviderType::Official, AppType::Claude),
            Provider::new("relay", ProviderType::Packycode, AppType::Claude),
            Provider::new("custom", ProviderType::Custom, AppType::Claude),
        ];
        let input = AssemblyInput::select(AppType::Claude, &providers, &[], &[], &[]);
        assert_eq!(input.credential_provider().map(|p| p.name.as_str()), Some("relay"));
    }

    #[test]
    fn test_artifact_insert_replaces_same_path() {
        let mut artifact = Artifact::new(AppType::Gemini);
        artifact.insert_text("settings.json", "{}");
        artifact.insert_text("GEMINI.md", "hi");
        artifact.insert_text("settings.json", "{\"a\":1}");
        assert_eq!(artifact.len(), 2);
        assert_eq!(artifact.text("settings.json"), Some("{\"a\":1}"));
        assert_eq!(artifact.paths().collect::<Vec<_>>(), vec!["settings.json", "GEMINI.md"]);
    }

    #[test]
    fn test_assembler_for_matches_app() {
        for app in AppType::ALL {
            assert_eq!(assembler_for(app).app(), app);
        }
    }
}
