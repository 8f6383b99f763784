//! Codex CLI assembler: `config.toml` and `AGENTS.md`.

use crate::model::{McpServer, TransportType};
use crate::toml_doc::{TomlDocument, sanitize_key};
use crate::types::AppType;

use super::{Artifact, AssemblyInput, ClientAssembler, add_prompt_file};

/// Model written when no selected provider configures one
pub const DEFAULT_CODEX_MODEL: &str = "o4-mini";

#[derive(Debug, Default, Clone, Copy)]
pub struct CodexAssembler;

impl CodexAssembler {
    /// Render `config.toml`
    pub fn config_toml(input: &AssemblyInput<'_>) -> String {
        let mut doc = TomlDocument::new();
        doc.comment("switchboard - Codex CLI config")
            .comment("place at: ~/.codex/config.toml")
            .blank();

        let provider = input.credential_provider();
        doc.set(
            "model",
            provider
                .and_then(|p| p.model())
                .unwrap_or(DEFAULT_CODEX_MODEL),
        );
        if let Some(provider) = provider {
            if let Some(key) = provider.api_key() {
                doc.set("api_key", key);
            }
            if let Some(url) = provider.effective_base_url() {
                doc.set("provider_base_url", url);
            }
        }

        CodexMcpEncoding::write_servers(&mut doc, &input.mcp_servers);
        doc.render()
    }
}

/// The `[mcp_servers.<name>]` table encoding Codex reads.
///
/// Unlike [`super::TaggedMcpEncoding`], remote servers are written with only
/// a `url` key and no `type`. Table names are sanitized to
/// `[A-Za-z0-9_-]`; servers whose sanitized names collide are merged with the
/// later one winning, at the position of the first.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodexMcpEncoding;

impl CodexMcpEncoding {
    pub fn write_servers(doc: &mut TomlDocument, servers: &[&McpServer]) {
        let mut tables: Vec<(String, &McpServer)> = Vec::new();
        for server in servers {
            let key = sanitize_key(&server.name);
            match tables.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, slot)) => *slot = server,
                None => tables.push((key, server)),
            }
        }

        for (key, server) in tables {
            doc.blank().table(&["mcp_servers", key.as_str()]);
            Self::write_server(doc, server);
        }
    }

    fn write_server(doc: &mut TomlDocument, server: &McpServer) {
        match server.transport_type {
            TransportType::Stdio => {
                doc.set("type", "stdio")
                    .set("command", server.command_or_empty())
                    .set("args", server.args.clone());
            }
            TransportType::Http | TransportType::Sse => {
                doc.set("url", server.url_or_empty());
            }
        }
        for (key, value) in &server.env {
            doc.set_dotted(&["env", key.as_str()], value.as_str());
        }
    }
}

impl ClientAssembler for CodexAssembler {
    fn app(&self) -> AppType {
        AppType::Codex
    }

    fn config_file_name(&self) -> &'static str {
        "config.toml"
    }

    fn install_path(&self) -> &'static str {
        "~/.codex/config.toml"
    }

    fn assemble(&self, input: &AssemblyInput<'_>) -> Artifact {
        let mut artifact = Artifact::new(AppType::Codex);
        artifact.insert_text(self.config_file_name(), Self::config_toml(input));
        add_prompt_file(&mut artifact, input);
        artifact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelConfig, Prompt, Provider, ProviderType};
    use crate::types::TargetFile;

    fn codex_server(server: McpServer) -> McpServer {
        server.with_bindings([AppType::Codex])
    }

    #[test]
    fn test_empty_input_writes_header_and_default_model() {
        let input = AssemblyInput::select(AppType::Codex, &[], &[], &[], &[]);
        assert_eq!(
            CodexAssembler::config_toml(&input),
            "# switchboard - Codex CLI config\n# place at: ~/.codex/config.toml\n\nmodel = \"o4-mini\"\n"
        );
    }

    #[test]
    fn test_custom_provider_lines() {
        let providers = vec![Provider {
            api_key: Some("sk-2".to_string()),
            base_url: Some("https://relay.example/v1".to_string()),
            model_config: Some(ModelConfig::with_model("gpt-5")),
            ..Provider::new("relay", ProviderType::Custom, AppType::Codex)
        }];
        let input = AssemblyInput::select(AppType::Codex, &providers, &[], &[], &[]);
        let toml = CodexAssembler::config_toml(&input);
        assert!(toml.contains("model = \"gpt-5\"\napi_key = \"sk-2\"\nprovider_base_url = \"https://relay.example/v1\"\n"));
    }

    #[test]
    fn test_stdio_table_without_env() {
        let servers = vec![codex_server(McpServer::stdio("fs", "npx", ["-y", "pkg"]))];
        let input = AssemblyInput::select(AppType::Codex, &[], &servers, &[], &[]);
        let toml = CodexAssembler::config_toml(&input);
        assert!(toml.ends_with(
            "\n[mcp_servers.fs]\ntype = \"stdio\"\ncommand = \"npx\"\nargs = [\"-y\", \"pkg\"]\n"
        ));
        assert!(!toml.contains("env."));
    }

    #[test]
    fn test_remote_table_has_no_type() {
        let servers = vec![codex_server(McpServer::remote(
            "my web",
            TransportType::Http,
            "https://x",
        ))];
        let input = AssemblyInput::select(AppType::Codex, &[], &servers, &[], &[]);
        let toml = CodexAssembler::config_toml(&input);
        assert!(toml.ends_with("\n[mcp_servers.my_web]\nurl = \"https://x\"\n"));
        assert!(!toml.contains("type = \"http\""));
    }

    #[test]
    fn test_args_and_env_are_escaped() {
        let servers = vec![codex_server(
            McpServer::stdio("win", "node", [r#"C:\srv\"main".js"#]).with_env("GREETING", "say \"hi\""),
        )];
        let input = AssemblyInput::select(AppType::Codex, &[], &servers, &[], &[]);
        let toml = CodexAssembler::config_toml(&input);
        assert!(toml.contains(r#"args = ["C:\\srv\\\"main\".js"]"#));
        assert!(toml.contains(r#"env.GREETING = "say \"hi\"""#));

        let parsed: toml::Value = toml::from_str(&toml).expect("valid toml");
        let table = &parsed["mcp_servers"]["win"];
        assert_eq!(table["args"][0].as_str(), Some(r#"C:\srv\"main".js"#));
        assert_eq!(table["env"]["GREETING"].as_str(), Some("say \"hi\""));
    }

    #[test]
    fn test_sanitized_collisions_keep_toml_valid() {
        let servers = vec![
            codex_server(McpServer::stdio("a.b", "first", Vec::<String>::new())),
            codex_server(McpServer::stdio("a b", "second", Vec::<String>::new())),
        ];
        let input = AssemblyInput::select(AppType::Codex, &[], &servers, &[], &[]);
        let toml = CodexAssembler::config_toml(&input);
        assert_eq!(toml.matches("[mcp_servers.a_b]").count(), 1);
        let parsed: toml::Value = toml::from_str(&toml).expect("valid toml");
        assert_eq!(parsed["mcp_servers"]["a_b"]["command"].as_str(), Some("second"));
    }

    #[test]
    fn test_assemble_adds_agents_md() {
        let prompts = vec![Prompt::new("agents", TargetFile::AgentsMd, "Use cargo.").activated()];
        let input = AssemblyInput::select(AppType::Codex, &[], &[], &prompts, &[]);
        let artifact = CodexAssembler.assemble(&input);
        assert_eq!(artifact.text("AGENTS.md"), Some("Use cargo."));
        assert!(artifact.text("config.toml").is_some());
    }
}
