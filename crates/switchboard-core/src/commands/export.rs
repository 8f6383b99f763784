//! Export, backup, import and sharing for one user's records.

use std::fmt;

use chrono::NaiveDate;

use crate::archive::{self, ArchiveBlob, BackupSnapshot};
use crate::client::{AppStats, Artifact, AssemblyInput, assembler_for};
use crate::import::{self, ImportBatch, ImportReport, ShareLink};
use crate::store::RecordStore;
use crate::types::{AppType, UserId};

/// Collections that can be exported on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Providers,
    McpServers,
    Prompts,
    Skills,
    SkillsRepos,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 5] = [
        ModuleKind::Providers,
        ModuleKind::McpServers,
        ModuleKind::Prompts,
        ModuleKind::Skills,
        ModuleKind::SkillsRepos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Providers => "providers",
            ModuleKind::McpServers => "mcp_servers",
            ModuleKind::Prompts => "prompts",
            ModuleKind::Skills => "skills",
            ModuleKind::SkillsRepos => "skills_repos",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ModuleKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "providers" | "provider" => Ok(ModuleKind::Providers),
            "mcp_servers" | "mcp" => Ok(ModuleKind::McpServers),
            "prompts" | "prompt" => Ok(ModuleKind::Prompts),
            "skills" | "skill" => Ok(ModuleKind::Skills),
            "skills_repos" | "repos" => Ok(ModuleKind::SkillsRepos),
            _ => anyhow::bail!(
                "Invalid module: '{}'. Valid values: providers, mcp_servers, prompts, skills, skills_repos",
                value
            ),
        }
    }
}

#[derive(Debug)]
pub struct ExportCommand<'s, S> {
    store: &'s S,
    user: UserId,
}

impl<'s, S: RecordStore> ExportCommand<'s, S> {
    pub fn new(store: &'s S, user: UserId) -> Self {
        Self { store, user }
    }

    pub fn snapshot(&self) -> anyhow::Result<BackupSnapshot> {
        BackupSnapshot::from_store(self.store, &self.user)
    }

    /// Native config files for `app`
    pub fn assemble(&self, app: AppType) -> anyhow::Result<Artifact> {
        let snapshot = self.snapshot()?;
        Ok(assemble_snapshot(&snapshot, app))
    }

    /// What each tool's export would contain
    pub fn stats(&self) -> anyhow::Result<Vec<AppStats>> {
        let snapshot = self.snapshot()?;
        Ok(AppType::ALL
            .into_iter()
            .map(|app| select(&snapshot, app).stats())
            .collect())
    }

    pub fn export_archive(&self, app: AppType, date: NaiveDate) -> anyhow::Result<ArchiveBlob> {
        archive::build_export_archive(&self.assemble(app)?, date)
    }

    pub fn backup(&self, date: NaiveDate) -> anyhow::Result<ArchiveBlob> {
        Ok(archive::build_backup_archive(&self.snapshot()?, date)?)
    }

    pub fn export_module(&self, kind: ModuleKind, date: NaiveDate) -> anyhow::Result<ArchiveBlob> {
        let snapshot = self.snapshot()?;
        match kind {
            ModuleKind::Providers => archive::export_module(&snapshot.providers, date),
            ModuleKind::McpServers => archive::export_module(&snapshot.mcp_servers, date),
            ModuleKind::Prompts => archive::export_module(&snapshot.prompts, date),
            ModuleKind::Skills => archive::export_module(&snapshot.skills, date),
            ModuleKind::SkillsRepos => archive::export_module(&snapshot.skills_repos, date),
        }
    }

    /// Share link over the enabled providers
    pub fn share_link(&self) -> anyhow::Result<ShareLink> {
        Ok(ShareLink::from_providers(&self.snapshot()?.providers))
    }

    /// Import a module JSON file.
    ///
    /// A malformed or mixed file fails before any insert; a single bad row is
    /// skipped and counted.
    pub fn import_module(&self, json: &str) -> anyhow::Result<ImportReport> {
        let batch = ImportBatch::decode(json)?;
        Ok(import::import_batch(self.store, &self.user, batch))
    }

    pub fn restore_backup(&self, bytes: &[u8]) -> anyhow::Result<Vec<ImportReport>> {
        let snapshot = archive::read_backup_archive(bytes)?;
        Ok(import::restore_backup(self.store, &self.user, snapshot))
    }

    pub fn import_share_link(&self, link: &str) -> anyhow::Result<ImportReport> {
        let link = ShareLink::from_url(link)?;
        Ok(link.import(self.store, &self.user))
    }
}

fn select(snapshot: &BackupSnapshot, app: AppType) -> AssemblyInput<'_> {
    AssemblyInput::select(
        app,
        &snapshot.providers,
        &snapshot.mcp_servers,
        &snapshot.prompts,
        &snapshot.skills,
    )
}

/// Run the assembler for `app` over a snapshot
pub fn assemble_snapshot(snapshot: &BackupSnapshot, app: AppType) -> Artifact {
    assembler_for(app).assemble(&select(snapshot, app))
}
