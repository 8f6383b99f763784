//! Prompt operations.
//!
//! At most one prompt per instruction file is active: activating a prompt
//! deactivates the others targeting the same file.

use uuid::Uuid;

use super::RecordCommand;
use crate::model::{Prompt, Record};
use crate::store::RecordStore;

impl<S: RecordStore> RecordCommand<'_, S, Prompt> {
    pub fn activate(&self, id: Uuid) -> anyhow::Result<Record<Prompt>> {
        let target = self.get(id)?.data.target_file;
        for other in self.store().list::<Prompt>(self.user())? {
            if other.id != id && other.data.is_active && other.data.target_file == target {
                tracing::debug!("Deactivating prompt '{}'", other.data.name);
                self.modify(other.id, |prompt| prompt.is_active = false)?;
            }
        }
        self.modify(id, |prompt| prompt.is_active = true)
    }

    pub fn deactivate(&self, id: Uuid) -> anyhow::Result<Record<Prompt>> {
        self.modify(id, |prompt| prompt.is_active = false)
    }

    /// Create a prompt, keeping the one-active-per-file rule
    pub fn add(&self, prompt: Prompt) -> anyhow::Result<Record<Prompt>> {
        let active = prompt.is_active;
        let record = self.create(Prompt {
            is_active: false,
            ..prompt
        })?;
        if active {
            return self.activate(record.id);
        }
        Ok(record)
    }
}
