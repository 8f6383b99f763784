//! Prompt records: Markdown instruction blocks for one tool's instruction file.

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::types::TargetFile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub name: String,
    pub target_file: TargetFile,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_active: bool,
}

impl Prompt {
    pub fn new(
        name: impl Into<String>,
        target_file: TargetFile,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_file,
            content: content.into(),
            is_active: false,
        }
    }

    pub fn activated(mut self) -> Self {
        self.is_active = true;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Prompt name cannot be empty");
        }
        Ok(())
    }
}

impl Entity for Prompt {
    const COLLECTION: &'static str = "prompts";

    fn display_name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> anyhow::Result<()> {
        self.validate()
    }
}
