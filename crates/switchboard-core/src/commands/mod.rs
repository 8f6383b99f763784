//! High-level record operations.
//!
//! This module is the public API the CLI drives: CRUD over every record kind
//! scoped to one user, plus export, backup and sharing. [`RecordCommand`]
//! carries the operations common to all kinds; kind-specific ones live in the
//! submodules as further `impl` blocks.

pub mod export;
pub mod mcp;
pub mod prompt;
pub mod provider;
pub mod skill;

use std::marker::PhantomData;

use anyhow::Context;
use uuid::Uuid;

use crate::model::{Entity, McpServer, Prompt, Provider, Record, Skill, SkillsRepo};
use crate::query::{Queryable, RecordQuery};
use crate::store::RecordStore;
use crate::types::UserId;

pub use export::{ExportCommand, ModuleKind};

/// Shortest id prefix accepted in place of a full id
pub const SHORT_ID_LEN: usize = 8;

pub type ProviderCommand<'s, S> = RecordCommand<'s, S, Provider>;
pub type McpCommand<'s, S> = RecordCommand<'s, S, McpServer>;
pub type PromptCommand<'s, S> = RecordCommand<'s, S, Prompt>;
pub type SkillCommand<'s, S> = RecordCommand<'s, S, Skill>;
pub type RepoCommand<'s, S> = RecordCommand<'s, S, SkillsRepo>;

/// CRUD over the `T` collection of one user
#[derive(Debug)]
pub struct RecordCommand<'s, S, T> {
    store: &'s S,
    user: UserId,
    _kind: PhantomData<T>,
}

impl<'s, S: RecordStore, T: Entity + Queryable> RecordCommand<'s, S, T> {
    pub fn new(store: &'s S, user: UserId) -> Self {
        Self {
            store,
            user,
            _kind: PhantomData,
        }
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn list(&self, query: &RecordQuery) -> anyhow::Result<Vec<Record<T>>> {
        Ok(query.apply(self.store.list::<T>(&self.user)?))
    }

    pub fn count(&self) -> anyhow::Result<usize> {
        self.store.count::<T>(&self.user)
    }

    pub fn get(&self, id: Uuid) -> anyhow::Result<Record<T>> {
        self.store
            .get::<T>(&self.user, id)?
            .ok_or_else(|| anyhow::anyhow!("No {} record with id {}", T::COLLECTION, id))
    }

    /// Resolve a record by id, by unique name, or by a unique id prefix of at
    /// least [`SHORT_ID_LEN`] characters.
    pub fn find(&self, key: &str) -> anyhow::Result<Record<T>> {
        if let Ok(id) = Uuid::parse_str(key) {
            return self.get(id);
        }
        let mut matches: Vec<Record<T>> = self
            .store
            .list::<T>(&self.user)?
            .into_iter()
            .filter(|record| record.data.display_name() == key)
            .collect();
        if matches.is_empty() && key.len() >= SHORT_ID_LEN {
            matches = self
                .store
                .list::<T>(&self.user)?
                .into_iter()
                .filter(|record| record.id.to_string().starts_with(key))
                .collect();
        }
        match matches.len() {
            0 => anyhow::bail!("No {} record named '{}'", T::COLLECTION, key),
            1 => Ok(matches.remove(0)),
            n => anyhow::bail!(
                "{} {} records are named '{}', use the id instead",
                n,
                T::COLLECTION,
                key
            ),
        }
    }

    pub fn create(&self, data: T) -> anyhow::Result<Record<T>> {
        data.check()?;
        let record = self
            .store
            .insert(&self.user, data)
            .with_context(|| format!("Failed to create {} record", T::COLLECTION))?;
        tracing::info!("Created {} '{}'", T::COLLECTION, record.data.display_name());
        Ok(record)
    }

    pub fn update(&self, id: Uuid, data: T) -> anyhow::Result<Record<T>> {
        data.check()?;
        self.store
            .update(&self.user, id, data)
            .with_context(|| format!("Failed to update {} record {}", T::COLLECTION, id))
    }

    /// Read, change and write back one record.
    pub fn modify(&self, id: Uuid, change: impl FnOnce(&mut T)) -> anyhow::Result<Record<T>> {
        let mut data = self.get(id)?.data;
        change(&mut data);
        self.update(id, data)
    }

    /// Remove one record. Related records are left in place.
    pub fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        if !self.store.delete::<T>(&self.user, id)? {
            anyhow::bail!("No {} record with id {}", T::COLLECTION, id);
        }
        tracing::info!("Deleted {} {}", T::COLLECTION, id);
        Ok(())
    }
}
