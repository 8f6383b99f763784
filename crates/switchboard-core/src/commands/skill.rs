//! Skill and skill repository operations.

use uuid::Uuid;

use super::RecordCommand;
use crate::model::{Record, Skill, SkillsRepo};
use crate::skills::{SkillScanner, scan_repo};
use crate::store::RecordStore;

impl<S: RecordStore> RecordCommand<'_, S, Skill> {
    pub fn set_installed(&self, id: Uuid, installed: bool) -> anyhow::Result<Record<Skill>> {
        self.modify(id, |skill| skill.installed = installed)
    }

    pub fn toggle_installed(&self, id: Uuid) -> anyhow::Result<Record<Skill>> {
        self.modify(id, |skill| skill.installed = !skill.installed)
    }
}

impl<S: RecordStore> RecordCommand<'_, S, SkillsRepo> {
    /// Register a repository unless the same `owner/repo` is already known
    pub fn add_repo(&self, repo: SkillsRepo) -> anyhow::Result<Record<SkillsRepo>> {
        let full_name = repo.full_name();
        let exists = self
            .store()
            .list::<SkillsRepo>(self.user())?
            .iter()
            .any(|existing| existing.data.full_name().eq_ignore_ascii_case(&full_name));
        if exists {
            anyhow::bail!("Repository {} is already registered", full_name);
        }
        self.create(repo)
    }

    /// Find by id or by `owner/repo`
    pub fn find_repo(&self, key: &str) -> anyhow::Result<Record<SkillsRepo>> {
        if let Ok(id) = Uuid::parse_str(key) {
            return self.get(id);
        }
        self.store()
            .list::<SkillsRepo>(self.user())?
            .into_iter()
            .find(|repo| repo.data.full_name().eq_ignore_ascii_case(key))
            .ok_or_else(|| anyhow::anyhow!("No skills repository {}", key))
    }

    /// Scan one repository for new skills; returns how many were added
    pub async fn scan(&self, id: Uuid, scanner: &SkillScanner) -> anyhow::Result<usize> {
        let repo = self.get(id)?;
        scan_repo(self.store(), self.user(), scanner, &repo).await
    }
}
