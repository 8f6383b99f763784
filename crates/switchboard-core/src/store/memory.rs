//! In-memory record store.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Context;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::RecordStore;
use crate::model::{Entity, Record};
use crate::types::UserId;

/// Keeps rows as JSON values keyed by `(user, collection)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<(UserId, &'static str), Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_rows<R>(
        &self,
        user: &UserId,
        collection: &'static str,
        f: impl FnOnce(&mut Vec<Value>) -> anyhow::Result<R>,
    ) -> anyhow::Result<R> {
        let mut guard = self
            .collections
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        let rows = guard.entry((user.clone(), collection)).or_default();
        f(rows)
    }
}

fn decode<T: Entity>(rows: &[Value]) -> anyhow::Result<Vec<Record<T>>> {
    rows.iter()
        .map(|row| {
            serde_json::from_value(row.clone())
                .with_context(|| format!("Corrupt {} row", T::COLLECTION))
        })
        .collect()
}

impl RecordStore for MemoryStore {
    fn list<T: Entity>(&self, user: &UserId) -> anyhow::Result<Vec<Record<T>>> {
        let mut records = self.with_rows(user, T::COLLECTION, |rows| decode::<T>(rows))?;
        T::sort_records(&mut records);
        Ok(records)
    }

    fn insert<T: Entity>(&self, user: &UserId, data: T) -> anyhow::Result<Record<T>> {
        let record = Record::new(user.clone(), data, Utc::now());
        let row = serde_json::to_value(&record).context("Failed to serialize record")?;
        self.with_rows(user, T::COLLECTION, |rows| {
            rows.push(row);
            Ok(())
        })?;
        Ok(record)
    }

    fn update<T: Entity>(&self, user: &UserId, id: Uuid, data: T) -> anyhow::Result<Record<T>> {
        self.with_rows(user, T::COLLECTION, |rows| {
            let mut records = decode::<T>(rows)?;
            let index = records
                .iter()
                .position(|record| record.id == id)
                .ok_or_else(|| anyhow::anyhow!("No {} record with id {}", T::COLLECTION, id))?;
            records[index].data = data;
            records[index].updated_at = Utc::now();
            rows[index] = serde_json::to_value(&records[index])?;
            Ok(records.swap_remove(index))
        })
    }

    fn delete<T: Entity>(&self, user: &UserId, id: Uuid) -> anyhow::Result<bool> {
        self.with_rows(user, T::COLLECTION, |rows| {
            let before = rows.len();
            let id = Value::String(id.to_string());
            rows.retain(|row| row.get("id") != Some(&id));
            Ok(rows.len() != before)
        })
    }
}
