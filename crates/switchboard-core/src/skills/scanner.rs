//! Discover skills in GitHub repositories through the contents API.

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::model::{Record, Skill, SkillsRepo};
use crate::store::RecordStore;
use crate::types::UserId;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Maximum length of a description taken from a README
const MAX_DESCRIPTION_CHARS: usize = 200;

/// One item of a contents API directory listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl RepoEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }
}

#[derive(Debug, Deserialize)]
struct FileContent {
    #[serde(default)]
    content: String,
}

/// Thin client over the GitHub contents API
#[derive(Debug, Clone)]
pub struct SkillScanner {
    client: reqwest::Client,
    api_base: String,
}

impl SkillScanner {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_api_base(GITHUB_API_BASE)
    }

    /// Point the scanner at another API root (GitHub Enterprise, test servers)
    pub fn with_api_base(api_base: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn contents_url(&self, repo: &SkillsRepo, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/repos/{}/{}/contents", self.api_base, repo.owner, repo.repo)
        } else {
            format!(
                "{}/repos/{}/{}/contents/{}",
                self.api_base, repo.owner, repo.repo, path
            )
        }
    }

    /// List the directories under the repository's skill subdirectory.
    pub async fn list_skill_dirs(&self, repo: &SkillsRepo) -> anyhow::Result<Vec<RepoEntry>> {
        let url = self.contents_url(repo, &repo.subdirectory);
        let response = self
            .client
            .get(&url)
            .query(&[("ref", repo.branch.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to list {}", url))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!(
                "Repository path not found: {}/{}, check the subdirectory setting",
                repo.full_name(),
                repo.subdirectory
            );
        }
        if !status.is_success() {
            anyhow::bail!("GitHub API error: HTTP {} from {}", status.as_u16(), url);
        }

        // A file path yields an object instead of a listing; treat it as empty.
        let listing: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse GitHub contents response")?;
        let entries: Vec<RepoEntry> = match listing {
            serde_json::Value::Array(_) => {
                serde_json::from_value(listing).context("Unexpected GitHub contents layout")?
            }
            _ => Vec::new(),
        };
        Ok(entries.into_iter().filter(RepoEntry::is_dir).collect())
    }

    /// Description from `<dir>/README.md`, if the file exists and has text.
    ///
    /// Any failure is treated as "no description".
    pub async fn fetch_description(&self, repo: &SkillsRepo, dir_path: &str) -> Option<String> {
        let url = self.contents_url(repo, &format!("{}/README.md", dir_path.trim_matches('/')));
        let response = self
            .client
            .get(&url)
            .query(&[("ref", repo.branch.as_str())])
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            tracing::debug!("No README for {} ({})", dir_path, response.status());
            return None;
        }
        let file: FileContent = response.json().await.ok()?;
        let cleaned: String = file.content.split_whitespace().collect();
        let bytes = STANDARD.decode(cleaned).ok()?;
        readme_description(&String::from_utf8_lossy(&bytes))
    }
}

/// First line that is neither blank nor a heading, trimmed and capped at
/// 200 characters.
pub fn readme_description(readme: &str) -> Option<String> {
    readme
        .lines()
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.trim().chars().take(MAX_DESCRIPTION_CHARS).collect())
}

/// Scan `repo` and insert every skill directory not yet recorded for it.
///
/// Returns the number of skills inserted. Existing skills are matched by
/// name within the same repository and left untouched.
pub async fn scan_repo<S: RecordStore>(
    store: &S,
    user: &UserId,
    scanner: &SkillScanner,
    repo: &Record<SkillsRepo>,
) -> anyhow::Result<usize> {
    let dirs = scanner.list_skill_dirs(&repo.data).await?;
    let known: Vec<String> = store
        .list::<Skill>(user)?
        .into_iter()
        .filter(|skill| skill.data.repo_id == Some(repo.id))
        .map(|skill| skill.data.name)
        .collect();

    let mut inserted = 0;
    for dir in dirs {
        if known.contains(&dir.name) {
            continue;
        }
        let description = scanner.fetch_description(&repo.data, &dir.path).await;
        let skill = Skill {
            repo_id: Some(repo.id),
            ..Skill::new(dir.name.clone(), description)
        };
        match store.insert(user, skill) {
            Ok(_) => inserted += 1,
            Err(e) => tracing::warn!("Failed to record skill '{}': {:#}", dir.name, e),
        }
    }

    tracing::info!("Scanned {}: {} new skill(s)", repo.data.full_name(), inserted);
    Ok(inserted)
}
