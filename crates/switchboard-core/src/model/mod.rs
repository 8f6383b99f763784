//! Record kinds managed by switchboard.
//!
//! Every entity is stored wrapped in a [`Record`], which adds the identity and
//! bookkeeping columns owned by the record store. The entity types themselves
//! only carry user data, so stripping a record for export is just taking
//! `record.data`.

pub mod mcp;
pub mod prompt;
pub mod provider;
pub mod skill;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

pub use mcp::{McpServer, TransportType};
pub use prompt::Prompt;
pub use provider::{ModelConfig, Provider, ProviderType};
pub use skill::{Skill, SkillsRepo};

/// A persisted row: store-owned columns plus the entity's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
pub struct Record<T> {
    pub id: Uuid,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Record<T> {
    /// Create a fresh row with a new id and both timestamps set to `now`.
    pub fn new(user_id: UserId, data: T, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            updated_at: now,
            data,
        }
    }
}

/// An entity kind that lives in its own collection of the record store.
pub trait Entity: Serialize + DeserializeOwned + Clone + std::fmt::Debug {
    /// Collection (table) name, also used as the backup file stem
    const COLLECTION: &'static str;

    /// Label used in logs and listings
    fn display_name(&self) -> &str;

    /// Reject rows that must not be stored. Defaults to accepting everything.
    fn check(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Put records into the order listings and exports use.
    ///
    /// The default keeps insertion order.
    fn sort_records(_records: &mut [Record<Self>]) {}
}
