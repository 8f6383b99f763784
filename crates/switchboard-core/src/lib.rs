//! Switchboard Core Library
//!
//! Domain logic for managing provider, MCP server, prompt and skill profiles
//! and turning them into the native configuration files of Claude Code,
//! Codex CLI, Gemini CLI and OpenCode.

pub mod archive;
pub mod client;
pub mod commands;
pub mod config;
pub mod import;
pub mod model;
pub mod optimize;
pub mod presets;
pub mod probe;
pub mod query;
pub mod skills;
pub mod store;
pub mod toml_doc;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Records
    pub use crate::model::{
        Entity, McpServer, ModelConfig, Prompt, Provider, ProviderType, Record, Skill,
        SkillsRepo, TransportType,
    };
    pub use crate::types::{AppType, TargetFile, UserId};

    // Store
    pub use crate::store::{FileStore, MemoryStore, RecordStore};

    // Export
    pub use crate::archive::{ArchiveBlob, BackupSnapshot};
    pub use crate::client::{Artifact, ArtifactContent, AssemblyInput, ClientAssembler};

    // Import
    pub use crate::import::{ImportBatch, ImportReport, ShareLink, SharedProvider};

    // Probe
    pub use crate::probe::{ProbeResult, ProbeTarget, Prober};

    // Settings
    pub use crate::config::Settings;
}
