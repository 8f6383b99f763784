//! JSON-file backed record store.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use uuid::Uuid;

use super::RecordStore;
use crate::model::{Entity, Record};
use crate::types::UserId;

/// Stores each collection as `<root>/<user>/<collection>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, user: &UserId, collection: &str) -> PathBuf {
        self.root
            .join(user.as_str())
            .join(format!("{collection}.json"))
    }

    fn load<T: Entity>(&self, user: &UserId) -> anyhow::Result<Vec<Record<T>>> {
        let path = self.collection_path(user, T::COLLECTION);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read collection: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse collection: {}", path.display()))
    }

    fn save<T: Entity>(&self, user: &UserId, records: &[Record<T>]) -> anyhow::Result<()> {
        let path = self.collection_path(user, T::COLLECTION);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(records)
            .context("Failed to serialize collection")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write collection: {}", path.display()))?;
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn list<T: Entity>(&self, user: &UserId) -> anyhow::Result<Vec<Record<T>>> {
        let mut records = self.load::<T>(user)?;
        T::sort_records(&mut records);
        Ok(records)
    }

    fn insert<T: Entity>(&self, user: &UserId, data: T) -> anyhow::Result<Record<T>> {
        let mut records = self.load::<T>(user)?;
        let record = Record::new(user.clone(), data, Utc::now());
        records.push(record.clone());
        self.save(user, &records)?;
        tracing::debug!(
            collection = T::COLLECTION,
            id = %record.id,
            name = record.data.display_name(),
            "Inserted record"
        );
        Ok(record)
    }

    fn update<T: Entity>(&self, user: &UserId, id: Uuid, data: T) -> anyhow::Result<Record<T>> {
        let mut records = self.load::<T>(user)?;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| anyhow::anyhow!("No {} record with id {}", T::COLLECTION, id))?;
        record.data = data;
        record.updated_at = Utc::now();
        let updated = record.clone();
        self.save(user, &records)?;
        Ok(updated)
    }

    fn delete<T: Entity>(&self, user: &UserId, id: Uuid) -> anyhow::Result<bool> {
        let mut records = self.load::<T>(user)?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(user, &records)?;
        Ok(true)
    }
}
