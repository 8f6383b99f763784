//! Shared core types used across records, assemblers and the store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The CLI tools a profile can be exported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    /// Claude Code
    Claude,
    /// Codex CLI
    Codex,
    /// Gemini CLI
    Gemini,
    /// OpenCode
    OpenCode,
}

impl AppType {
    pub const ALL: [AppType; 4] = [
        AppType::Claude,
        AppType::Codex,
        AppType::Gemini,
        AppType::OpenCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Claude => "claude",
            AppType::Codex => "codex",
            AppType::Gemini => "gemini",
            AppType::OpenCode => "opencode",
        }
    }

    /// Human readable tool name
    pub fn label(&self) -> &'static str {
        match self {
            AppType::Claude => "Claude Code",
            AppType::Codex => "Codex CLI",
            AppType::Gemini => "Gemini CLI",
            AppType::OpenCode => "OpenCode",
        }
    }

    /// The instruction file this tool reads prompts from
    pub fn prompt_file(&self) -> TargetFile {
        match self {
            AppType::Claude => TargetFile::ClaudeMd,
            AppType::Codex => TargetFile::AgentsMd,
            AppType::Gemini => TargetFile::GeminiMd,
            AppType::OpenCode => TargetFile::OpenCodeMd,
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AppType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "claude" => Ok(AppType::Claude),
            "codex" => Ok(AppType::Codex),
            "gemini" => Ok(AppType::Gemini),
            "opencode" => Ok(AppType::OpenCode),
            _ => anyhow::bail!(
                "Invalid app type: '{}'. Valid values: claude, codex, gemini, opencode",
                value
            ),
        }
    }
}

/// Instruction file a prompt is written to. Maps 1:1 onto [`AppType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetFile {
    #[serde(rename = "CLAUDE.md")]
    ClaudeMd,
    #[serde(rename = "AGENTS.md")]
    AgentsMd,
    #[serde(rename = "GEMINI.md")]
    GeminiMd,
    #[serde(rename = "OPENCODE.md")]
    OpenCodeMd,
}

impl TargetFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            TargetFile::ClaudeMd => "CLAUDE.md",
            TargetFile::AgentsMd => "AGENTS.md",
            TargetFile::GeminiMd => "GEMINI.md",
            TargetFile::OpenCodeMd => "OPENCODE.md",
        }
    }

    pub fn app(&self) -> AppType {
        match self {
            TargetFile::ClaudeMd => AppType::Claude,
            TargetFile::AgentsMd => AppType::Codex,
            TargetFile::GeminiMd => AppType::Gemini,
            TargetFile::OpenCodeMd => AppType::OpenCode,
        }
    }
}

impl fmt::Display for TargetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl TryFrom<&str> for TargetFile {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim_end_matches(".md").trim_end_matches(".MD");
        match normalized.to_uppercase().as_str() {
            "CLAUDE" => Ok(TargetFile::ClaudeMd),
            "AGENTS" => Ok(TargetFile::AgentsMd),
            "GEMINI" => Ok(TargetFile::GeminiMd),
            "OPENCODE" => Ok(TargetFile::OpenCodeMd),
            _ => anyhow::bail!(
                "Invalid target file: '{}'. Valid values: CLAUDE.md, AGENTS.md, GEMINI.md, OPENCODE.md",
                value
            ),
        }
    }
}

/// Opaque owner of a set of records.
///
/// The core never interprets the value beyond using it as a partition key,
/// but it must be usable as a single path segment by file-backed stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> anyhow::Result<Self> {
        let value = value.into();
        if value.is_empty() {
            anyhow::bail!("User id cannot be empty");
        }
        if value == "." || value == ".." || value.contains(['/', '\\']) {
            anyhow::bail!("Invalid user id: '{}'", value);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_type_serialization() {
        let json = serde_json::to_string(&AppType::OpenCode).unwrap();
        assert_eq!(json, "\"opencode\"");
        let parsed: AppType = serde_json::from_str("\"codex\"").unwrap();
        assert_eq!(parsed, AppType::Codex);
    }

    #[test]
    fn test_target_file_maps_one_to_one() {
        for app in AppType::ALL {
            assert_eq!(app.prompt_file().app(), app);
        }
        let json = serde_json::to_string(&TargetFile::AgentsMd).unwrap();
        assert_eq!(json, "\"AGENTS.md\"");
    }

    #[test]
    fn test_target_file_parse_accepts_bare_names() {
        assert_eq!(TargetFile::try_from("gemini").unwrap(), TargetFile::GeminiMd);
        assert_eq!(TargetFile::try_from("OPENCODE.md").unwrap(), TargetFile::OpenCodeMd);
        assert!(TargetFile::try_from("README.md").is_err());
    }

    #[test]
    fn test_user_id_rejects_path_segments() {
        assert!(UserId::new("alice").is_ok());
        assert!(UserId::new("").is_err());
        assert!(UserId::new("..").is_err());
        assert!(UserId::new("a/b").is_err());
    }
}
