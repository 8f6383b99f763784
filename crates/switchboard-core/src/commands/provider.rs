//! Provider-specific operations.

use uuid::Uuid;

use super::RecordCommand;
use crate::model::{Provider, Record};
use crate::presets::ProviderPreset;
use crate::store::RecordStore;
use crate::types::AppType;

impl<S: RecordStore> RecordCommand<'_, S, Provider> {
    /// Create a provider placed after the existing ones
    pub fn add(&self, mut provider: Provider) -> anyhow::Result<Record<Provider>> {
        provider.sort_order = self.count()? as i64;
        self.create(provider)
    }

    pub fn add_preset(
        &self,
        preset: &ProviderPreset,
        app: AppType,
    ) -> anyhow::Result<Record<Provider>> {
        self.add(preset.build(app))
    }

    /// Copy a provider under a suffixed name, placed last
    pub fn duplicate(&self, id: Uuid) -> anyhow::Result<Record<Provider>> {
        let source = self.get(id)?;
        let copy = source.data.duplicate(self.count()? as i64);
        self.create(copy)
    }

    pub fn set_enabled(&self, id: Uuid, enabled: bool) -> anyhow::Result<Record<Provider>> {
        self.modify(id, |provider| provider.enabled = enabled)
    }

    pub fn toggle(&self, id: Uuid) -> anyhow::Result<Record<Provider>> {
        self.modify(id, |provider| provider.enabled = !provider.enabled)
    }
}
