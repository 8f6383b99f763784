//! Whole-account backup archives.

use std::io::{Cursor, Read};

use chrono::NaiveDate;
use serde::Serialize;

use super::{ArchiveBlob, date_stamp, write_zip};
use crate::model::{Entity, McpServer, Prompt, Provider, Skill, SkillsRepo};
use crate::store::{RecordStore, strip};
use crate::types::UserId;

/// Files written at the root of a backup archive, in order
pub const BACKUP_FILES: [&str; 5] = [
    "providers.json",
    "mcp_servers.json",
    "prompts.json",
    "skills.json",
    "skills_repos.json",
];

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Failed to write backup archive: {0}")]
    Write(#[source] zip::result::ZipError),

    #[error("Not a backup archive: {0}")]
    Archive(#[source] zip::result::ZipError),

    #[error("Failed to read {file} from backup: {source}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Every collection of one user, with store-owned columns removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackupSnapshot {
    pub providers: Vec<Provider>,
    pub mcp_servers: Vec<McpServer>,
    pub prompts: Vec<Prompt>,
    pub skills: Vec<Skill>,
    pub skills_repos: Vec<SkillsRepo>,
}

impl BackupSnapshot {
    pub fn from_store<S: RecordStore>(store: &S, user: &UserId) -> anyhow::Result<Self> {
        Ok(Self {
            providers: strip(&store.list::<Provider>(user)?),
            mcp_servers: strip(&store.list::<McpServer>(user)?),
            prompts: strip(&store.list::<Prompt>(user)?),
            skills: strip(&store.list::<Skill>(user)?),
            skills_repos: strip(&store.list::<SkillsRepo>(user)?),
        })
    }

    pub fn total(&self) -> usize {
        self.providers.len()
            + self.mcp_servers.len()
            + self.prompts.len()
            + self.skills.len()
            + self.skills_repos.len()
    }
}

fn file_name<T: Entity>() -> String {
    format!("{}.json", T::COLLECTION)
}

fn to_json<T: Serialize>(file: &str, rows: &[T]) -> Result<Vec<u8>, BackupError> {
    serde_json::to_vec_pretty(rows).map_err(|source| BackupError::Json {
        file: file.to_string(),
        source,
    })
}

/// Write `snapshot` as `switchboard-backup-<date>.zip`.
///
/// Skills lose their repository link, since repository ids are not
/// stable across accounts.
pub fn build_backup_archive(
    snapshot: &BackupSnapshot,
    date: NaiveDate,
) -> Result<ArchiveBlob, BackupError> {
    let skills: Vec<Skill> = snapshot.skills.iter().map(Skill::detached).collect();
    let files = [
        (file_name::<Provider>(), to_json("providers.json", &snapshot.providers)?),
        (file_name::<McpServer>(), to_json("mcp_servers.json", &snapshot.mcp_servers)?),
        (file_name::<Prompt>(), to_json("prompts.json", &snapshot.prompts)?),
        (file_name::<Skill>(), to_json("skills.json", &skills)?),
        (file_name::<SkillsRepo>(), to_json("skills_repos.json", &snapshot.skills_repos)?),
    ];

    let bytes = write_zip(
        files
            .iter()
            .map(|(name, json)| (name.clone(), json.as_slice())),
    )
    .map_err(BackupError::Write)?;

    tracing::info!("Built backup with {} record(s)", snapshot.total());
    Ok(ArchiveBlob {
        file_name: format!("switchboard-backup-{}.zip", date_stamp(date)),
        bytes,
    })
}

/// Read a backup archive back into a snapshot.
///
/// Missing collection files read as empty; present but malformed ones fail.
pub fn read_backup_archive(bytes: &[u8]) -> Result<BackupSnapshot, BackupError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(BackupError::Archive)?;
    Ok(BackupSnapshot {
        providers: read_collection(&mut archive)?,
        mcp_servers: read_collection(&mut archive)?,
        prompts: read_collection(&mut archive)?,
        skills: read_collection(&mut archive)?,
        skills_repos: read_collection(&mut archive)?,
    })
}

fn read_collection<T: Entity>(
    archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
) -> Result<Vec<T>, BackupError> {
    let file = file_name::<T>();
    let mut entry = match archive.by_name(&file) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            tracing::warn!("Backup has no {}, treating as empty", file);
            return Ok(Vec::new());
        }
        Err(e) => return Err(BackupError::Archive(e)),
    };

    let mut text = String::new();
    entry
        .read_to_string(&mut text)
        .map_err(|source| BackupError::Read {
            file: file.clone(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|source| BackupError::Json { file, source })
}
