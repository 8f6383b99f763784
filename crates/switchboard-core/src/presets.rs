//! Built-in starting points: provider presets, MCP server templates and
//! well-known skill repositories.

use crate::model::{McpServer, Provider, ProviderType, SkillsRepo};
use crate::types::AppType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub provider_type: ProviderType,
}

pub const PROVIDER_PRESETS: [ProviderPreset; 3] = [
    ProviderPreset {
        id: "official",
        name: "Official Login",
        provider_type: ProviderType::Official,
    },
    ProviderPreset {
        id: "packycode",
        name: "PackyCode",
        provider_type: ProviderType::Packycode,
    },
    ProviderPreset {
        id: "custom",
        name: "Custom",
        provider_type: ProviderType::Custom,
    },
];

impl ProviderPreset {
    pub fn find(id: &str) -> Option<&'static ProviderPreset> {
        PROVIDER_PRESETS.iter().find(|preset| preset.id == id)
    }

    /// A provider for `app`, base URL derived where the type implies one
    pub fn build(&self, app: AppType) -> Provider {
        Provider::new(self.name, self.provider_type, app)
    }
}

/// A ready-made stdio MCP server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McpTemplate {
    pub name: &'static str,
    pub command: &'static str,
    pub args: &'static [&'static str],
    pub description: &'static str,
}

pub const MCP_TEMPLATES: [McpTemplate; 3] = [
    McpTemplate {
        name: "mcp-fetch",
        command: "npx",
        args: &["-y", "@anthropics/mcp-fetch"],
        description: "Web requests: call external APIs and read page content",
    },
    McpTemplate {
        name: "mcp-filesystem",
        command: "npx",
        args: &["-y", "@anthropics/mcp-filesystem", "/path"],
        description: "Read and write files under a directory (replace /path)",
    },
    McpTemplate {
        name: "mcp-memory",
        command: "npx",
        args: &["-y", "@anthropics/mcp-memory"],
        description: "Persistent memory across sessions",
    },
];

impl McpTemplate {
    pub fn find(name: &str) -> Option<&'static McpTemplate> {
        MCP_TEMPLATES.iter().find(|template| template.name == name)
    }

    /// Server record with default bindings
    pub fn build(&self) -> McpServer {
        McpServer::stdio(self.name, self.command, self.args.iter().copied())
    }
}

/// A suggested skills repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoPreset {
    pub owner: &'static str,
    pub repo: &'static str,
    pub branch: Option<&'static str>,
    pub description: &'static str,
    pub category: RepoCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoCategory {
    /// Repositories of Claude skills
    Skills,
    /// General AI development references
    Dev,
}

pub const REPO_PRESETS: [RepoPreset; 11] = [
    RepoPreset {
        owner: "ComposioHQ",
        repo: "awesome-claude-skills",
        branch: Some("master"),
        description: "Large community collection of Claude skills",
        category: RepoCategory::Skills,
    },
    RepoPreset {
        owner: "anthropics",
        repo: "skills",
        branch: None,
        description: "Official Anthropic skills",
        category: RepoCategory::Skills,
    },
    RepoPreset {
        owner: "JimLiu",
        repo: "baoyu-skills",
        branch: None,
        description: "Baoyu's skill pack",
        category: RepoCategory::Skills,
    },
    RepoPreset {
        owner: "cexll",
        repo: "myclaude",
        branch: Some("master"),
        description: "Personal Claude skill set",
        category: RepoCategory::Skills,
    },
    RepoPreset {
        owner: "anthropics",
        repo: "anthropic-cookbook",
        branch: None,
        description: "Anthropic recipes",
        category: RepoCategory::Dev,
    },
    RepoPreset {
        owner: "openai",
        repo: "openai-cookbook",
        branch: None,
        description: "OpenAI recipes",
        category: RepoCategory::Dev,
    },
    RepoPreset {
        owner: "modelcontextprotocol",
        repo: "servers",
        branch: None,
        description: "Reference MCP servers",
        category: RepoCategory::Dev,
    },
    RepoPreset {
        owner: "microsoft",
        repo: "semantic-kernel",
        branch: None,
        description: "AI orchestration framework",
        category: RepoCategory::Dev,
    },
    RepoPreset {
        owner: "langchain-ai",
        repo: "langchain",
        branch: None,
        description: "LangChain framework",
        category: RepoCategory::Dev,
    },
    RepoPreset {
        owner: "run-llama",
        repo: "llama_index",
        branch: None,
        description: "LlamaIndex data framework",
        category: RepoCategory::Dev,
    },
    RepoPreset {
        owner: "sigoden",
        repo: "aichat",
        branch: None,
        description: "All-in-one AI CLI",
        category: RepoCategory::Dev,
    },
];

impl RepoPreset {
    /// Look up by `owner/repo`
    pub fn find(full_name: &str) -> Option<&'static RepoPreset> {
        REPO_PRESETS
            .iter()
            .find(|preset| format!("{}/{}", preset.owner, preset.repo) == full_name)
    }

    pub fn build(&self) -> SkillsRepo {
        let mut repo = SkillsRepo::new(self.owner, self.repo);
        if let Some(branch) = self.branch {
            repo.branch = branch.to_string();
        }
        repo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_presets_derive_urls() {
        let packy = ProviderPreset::find("packycode").unwrap().build(AppType::Gemini);
        assert_eq!(packy.name, "PackyCode");
        assert_eq!(packy.effective_base_url(), Some("https://api.packycode.com"));

        let custom = ProviderPreset::find("custom").unwrap().build(AppType::Codex);
        assert_eq!(custom.effective_base_url(), None);
        assert!(ProviderPreset::find("acme").is_none());
    }

    #[test]
    fn test_mcp_templates_are_valid_stdio_servers() {
        for template in &MCP_TEMPLATES {
            let server = template.build();
            server.validate().unwrap();
            assert_eq!(server.args[0], "-y");
            assert!(server.is_bound_to(AppType::Claude));
        }
        assert_eq!(
            McpTemplate::find("mcp-filesystem").unwrap().build().args.last().map(String::as_str),
            Some("/path")
        );
    }

    #[test]
    fn test_repo_presets() {
        let repo = RepoPreset::find("ComposioHQ/awesome-claude-skills").unwrap().build();
        assert_eq!(repo.branch, "master");
        assert_eq!(RepoPreset::find("anthropics/skills").unwrap().build().branch, "main");
        assert_eq!(
            REPO_PRESETS.iter().filter(|p| p.category == RepoCategory::Skills).count(),
            4
        );
    }
}
