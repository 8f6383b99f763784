//! Filtering of record listings by explicit parameters.

use uuid::Uuid;

use crate::model::{McpServer, Prompt, Provider, Record, Skill, SkillsRepo};
use crate::types::AppType;

/// Record kinds that can be filtered by a [`RecordQuery`]
pub trait Queryable {
    /// Text fields a search term is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Whether the record is relevant to `app`
    fn applies_to(&self, app: AppType) -> bool;

    /// Enabled, active or installed, depending on the kind
    fn is_active(&self) -> bool;

    fn repo_id(&self) -> Option<Uuid> {
        None
    }
}

impl Queryable for Provider {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.base_url.as_deref());
        fields
    }

    fn applies_to(&self, app: AppType) -> bool {
        self.app_type == app
    }

    fn is_active(&self) -> bool {
        self.enabled
    }
}

impl Queryable for McpServer {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.command.as_deref());
        fields.extend(self.url.as_deref());
        fields
    }

    fn applies_to(&self, app: AppType) -> bool {
        self.is_bound_to(app)
    }

    fn is_active(&self) -> bool {
        self.enabled
    }
}

impl Queryable for Prompt {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.content.as_str()]
    }

    fn applies_to(&self, app: AppType) -> bool {
        self.target_file.app() == app
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Queryable for Skill {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description_or_empty()]
    }

    /// Skills are only exported for Claude Code
    fn applies_to(&self, app: AppType) -> bool {
        app == AppType::Claude
    }

    fn is_active(&self) -> bool {
        self.installed
    }

    fn repo_id(&self) -> Option<Uuid> {
        self.repo_id
    }
}

impl Queryable for SkillsRepo {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.owner.as_str(), self.repo.as_str(), self.subdirectory.as_str()]
    }

    fn applies_to(&self, app: AppType) -> bool {
        app == AppType::Claude
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// Listing filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Case-insensitive substring
    pub search: Option<String>,
    pub app: Option<AppType>,
    pub active_only: bool,
    pub repo_id: Option<Uuid>,
}

impl RecordQuery {
    pub fn matches<T: Queryable>(&self, record: &T) -> bool {
        if self.active_only && !record.is_active() {
            return false;
        }
        if let Some(app) = self.app
            && !record.applies_to(app)
        {
            return false;
        }
        if let Some(repo_id) = self.repo_id
            && record.repo_id() != Some(repo_id)
        {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                record
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }

    /// Keep matching records, preserving order
    pub fn apply<T: Queryable>(&self, records: Vec<Record<T>>) -> Vec<Record<T>> {
        records
            .into_iter()
            .filter(|record| self.matches(&record.data))
            .collect()
    }
}
