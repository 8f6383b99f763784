//! Skills discovered from source repositories, and the repositories themselves.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Installed skills are bundled into Claude exports
    #[serde(default)]
    pub installed: bool,
    /// Repository the skill was scanned from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<Uuid>,
}

impl Skill {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            installed: false,
            repo_id: None,
        }
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Copy without the repository link, as written to backups
    pub fn detached(&self) -> Self {
        Self {
            repo_id: None,
            ..self.clone()
        }
    }
}

impl Entity for Skill {
    const COLLECTION: &'static str = "skills";

    fn display_name(&self) -> &str {
        &self.name
    }

    fn sort_records(records: &mut [Record<Self>]) {
        records.sort_by(|a, b| a.data.name.cmp(&b.data.name));
    }
}

/// A GitHub repository skills are scanned from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsRepo {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Directory inside the repository holding one folder per skill
    #[serde(default)]
    pub subdirectory: String,
    #[serde(default)]
    pub is_default: bool,
}

fn default_branch() -> String {
    "main".to_string()
}

impl SkillsRepo {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: default_branch(),
            subdirectory: String::new(),
            is_default: false,
        }
    }

    /// Parse "owner/repo" or "owner/repo@branch"
    pub fn parse(spec: &str) -> anyhow::Result<Self> {
        let (path, branch) = match spec.split_once('@') {
            Some((path, branch)) if !branch.is_empty() => (path, Some(branch)),
            _ => (spec, None),
        };
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
            anyhow::bail!("Invalid GitHub repo format: {} (expected owner/repo[@branch])", spec);
        }
        let mut repo = Self::new(parts[0], parts[1]);
        if let Some(branch) = branch {
            repo.branch = branch.to_string();
        }
        Ok(repo)
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Entity for SkillsRepo {
    const COLLECTION: &'static str = "skills_repos";

    fn display_name(&self) -> &str {
        &self.repo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_spec() {
        let repo = SkillsRepo::parse("anthropics/skills").unwrap();
        assert_eq!(repo.owner, "anthropics");
        assert_eq!(repo.branch, "main");

        let repo = SkillsRepo::parse("ComposioHQ/awesome-claude-skills@master").unwrap();
        assert_eq!(repo.repo, "awesome-claude-skills");
        assert_eq!(repo.branch, "master");
    }

    #[test]
    fn test_parse_repo_spec_invalid() {
        assert!(SkillsRepo::parse("invalid-format").is_err());
        assert!(SkillsRepo::parse("a/b/c").is_err());
        assert!(SkillsRepo::parse("/b").is_err());
    }

    #[test]
    fn test_detached_drops_repo_link() {
        let mut skill = Skill::new("pdf", Some("PDF tools".to_string()));
        skill.repo_id = Some(Uuid::new_v4());
        assert_eq!(skill.detached().repo_id, None);
        assert_eq!(skill.detached().name, "pdf");
    }
}
