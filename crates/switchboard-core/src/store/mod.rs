//! Record store abstraction.
//!
//! The hosted database that owns user records is an external collaborator;
//! the core only needs list/insert/update/delete per collection, partitioned
//! by user. [`FileStore`] keeps collections as JSON files for offline use and
//! [`MemoryStore`] backs tests and dry runs.

mod file;
mod memory;

use uuid::Uuid;

use crate::model::{Entity, Record};
use crate::types::UserId;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Per-user CRUD over every [`Entity`] collection.
///
/// Inserts always assign a new id and fresh timestamps; callers never supply
/// them.
pub trait RecordStore {
    /// All rows of `T` owned by `user`, in [`Entity::sort_records`] order
    fn list<T: Entity>(&self, user: &UserId) -> anyhow::Result<Vec<Record<T>>>;

    fn insert<T: Entity>(&self, user: &UserId, data: T) -> anyhow::Result<Record<T>>;

    fn update<T: Entity>(&self, user: &UserId, id: Uuid, data: T) -> anyhow::Result<Record<T>>;

    /// Returns whether a row was removed
    fn delete<T: Entity>(&self, user: &UserId, id: Uuid) -> anyhow::Result<bool>;

    fn get<T: Entity>(&self, user: &UserId, id: Uuid) -> anyhow::Result<Option<Record<T>>> {
        Ok(self
            .list::<T>(user)?
            .into_iter()
            .find(|record| record.id == id))
    }

    fn count<T: Entity>(&self, user: &UserId) -> anyhow::Result<usize> {
        Ok(self.list::<T>(user)?.len())
    }
}

/// Strip store-owned columns from a set of rows.
pub fn strip<T: Clone>(records: &[Record<T>]) -> Vec<T> {
    records.iter().map(|record| record.data.clone()).collect()
}
