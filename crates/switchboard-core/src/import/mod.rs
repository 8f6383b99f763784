//! Re-inserting exported records: module JSON files, backups and share links.
//!
//! A module file is a JSON array of one record kind. The kind is decided per
//! element by its discriminating field (`provider_type`, `transport_type` or
//! `target_file`); an element that matches none or several kinds, or a file
//! mixing kinds, is rejected as a whole before anything is written. Past that
//! point each element is decoded and inserted on its own; a bad row is skipped.

mod share;

use std::fmt;

use serde_json::Value;

use crate::archive::BackupSnapshot;
use crate::model::{Entity, McpServer, Prompt, Provider, Skill, SkillsRepo};
use crate::store::RecordStore;
use crate::types::UserId;

pub use share::{SHARE_QUERY_PARAM, ShareLink, ShareLinkError, SharedProvider};

/// Record kinds a module file can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Provider,
    McpServer,
    Prompt,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Provider,
        RecordKind::McpServer,
        RecordKind::Prompt,
    ];

    /// Field whose presence identifies the kind
    pub fn discriminant(&self) -> &'static str {
        match self {
            RecordKind::Provider => "provider_type",
            RecordKind::McpServer => "transport_type",
            RecordKind::Prompt => "target_file",
        }
    }

    /// Classify one JSON element.
    pub fn classify(element: &Value) -> Result<Self, Vec<RecordKind>> {
        let Some(object) = element.as_object() else {
            return Err(Vec::new());
        };
        let matches: Vec<RecordKind> = Self::ALL
            .into_iter()
            .filter(|kind| object.contains_key(kind.discriminant()))
            .collect();
        match matches.as_slice() {
            [kind] => Ok(*kind),
            _ => Err(matches),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Provider => "provider",
            RecordKind::McpServer => "MCP server",
            RecordKind::Prompt => "prompt",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import file must contain a JSON array")]
    NotAnArray,

    #[error("Import file contains no records")]
    Empty,

    #[error("Element {index} is not a provider, MCP server or prompt")]
    UnknownKind { index: usize },

    #[error("Element {index} is ambiguous: it has fields of {kinds}")]
    Ambiguous { index: usize, kinds: String },

    #[error("Element {index} is a {found}, but the file holds {expected} records")]
    MixedKinds {
        index: usize,
        expected: RecordKind,
        found: RecordKind,
    },
}

/// A classified module file. Elements stay raw until insert so a row that
/// fails to deserialize is skipped on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    kind: RecordKind,
    elements: Vec<Value>,
}

impl ImportBatch {
    /// Parse and classify a module file.
    pub fn decode(json: &str) -> Result<Self, ImportError> {
        let Value::Array(elements) = serde_json::from_str::<Value>(json)? else {
            return Err(ImportError::NotAnArray);
        };
        let Some(first) = elements.first() else {
            return Err(ImportError::Empty);
        };
        let kind = classify_at(0, first)?;
        for (index, element) in elements.iter().enumerate().skip(1) {
            let found = classify_at(index, element)?;
            if found != kind {
                return Err(ImportError::MixedKinds {
                    index,
                    expected: kind,
                    found,
                });
            }
        }
        Ok(Self { kind, elements })
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn classify_at(index: usize, element: &Value) -> Result<RecordKind, ImportError> {
    RecordKind::classify(element).map_err(|matches| {
        if matches.is_empty() {
            ImportError::UnknownKind { index }
        } else {
            let kinds: Vec<String> = matches.iter().map(ToString::to_string).collect();
            ImportError::Ambiguous {
                index,
                kinds: kinds.join(", "),
            }
        }
    })
}

/// Outcome of inserting one collection's rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ImportReport {
    pub collection: &'static str,
    pub inserted: usize,
    pub skipped: usize,
}

impl ImportReport {
    fn new(collection: &'static str) -> Self {
        Self {
            collection,
            inserted: 0,
            skipped: 0,
        }
    }

    fn log(self) -> Self {
        tracing::info!(
            "Imported {} {} ({} skipped)",
            self.inserted,
            self.collection,
            self.skipped
        );
        self
    }
}

fn insert_one<S: RecordStore, T: Entity>(
    store: &S,
    user: &UserId,
    row: T,
    report: &mut ImportReport,
) {
    let name = row.display_name().to_string();
    match row.check().and_then(|()| store.insert(user, row)) {
        Ok(_) => report.inserted += 1,
        Err(e) => {
            tracing::warn!("Skipping {} '{}': {:#}", T::COLLECTION, name, e);
            report.skipped += 1;
        }
    }
}

/// Insert rows one at a time; a failing row is logged and skipped.
pub fn insert_rows<S: RecordStore, T: Entity>(
    store: &S,
    user: &UserId,
    rows: impl IntoIterator<Item = T>,
) -> ImportReport {
    let mut report = ImportReport::new(T::COLLECTION);
    for row in rows {
        insert_one(store, user, row, &mut report);
    }
    report.log()
}

/// Like [`insert_rows`], but each element is deserialized first.
///
/// Store-owned fields (`id`, `user_id`, timestamps) in the input are ignored.
pub fn insert_values<S: RecordStore, T: Entity>(
    store: &S,
    user: &UserId,
    values: impl IntoIterator<Item = Value>,
) -> ImportReport {
    let mut report = ImportReport::new(T::COLLECTION);
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(row) => insert_one(store, user, row, &mut report),
            Err(e) => {
                tracing::warn!("Skipping {} element {}: {}", T::COLLECTION, index, e);
                report.skipped += 1;
            }
        }
    }
    report.log()
}

/// Insert a classified module file for `user`.
pub fn import_batch<S: RecordStore>(store: &S, user: &UserId, batch: ImportBatch) -> ImportReport {
    let ImportBatch { kind, elements } = batch;
    match kind {
        RecordKind::Provider => insert_values::<_, Provider>(store, user, elements),
        RecordKind::McpServer => insert_values::<_, McpServer>(store, user, elements),
        RecordKind::Prompt => insert_values::<_, Prompt>(store, user, elements),
    }
}

/// Insert every collection of a backup, repositories before skills.
pub fn restore_backup<S: RecordStore>(
    store: &S,
    user: &UserId,
    snapshot: BackupSnapshot,
) -> Vec<ImportReport> {
    vec![
        insert_rows::<_, Provider>(store, user, snapshot.providers),
        insert_rows::<_, McpServer>(store, user, snapshot.mcp_servers),
        insert_rows::<_, Prompt>(store, user, snapshot.prompts),
        insert_rows::<_, SkillsRepo>(store, user, snapshot.skills_repos),
        insert_rows::<_, Skill>(store, user, snapshot.skills),
    ]
}
