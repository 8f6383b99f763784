//! Gemini CLI assembler: `settings.json` and `GEMINI.md`.
//!
//! Gemini reads its API key from its own environment, so provider
//! credentials are never written here.

use serde_json::{Value, json};

use super::{
    Artifact, AssemblyInput, ClientAssembler, TaggedMcpEncoding, add_prompt_file, pretty_json,
};
use crate::types::AppType;

#[derive(Debug, Default, Clone, Copy)]
pub struct GeminiCliAssembler;

impl GeminiCliAssembler {
    pub fn settings(input: &AssemblyInput<'_>) -> Value {
        json!({ "mcpServers": TaggedMcpEncoding::render_servers(&input.mcp_servers) })
    }
}

impl ClientAssembler for GeminiCliAssembler {
    fn app(&self) -> AppType {
        AppType::Gemini
    }

    fn config_file_name(&self) -> &'static str {
        "settings.json"
    }

    fn install_path(&self) -> &'static str {
        "~/.gemini/settings.json"
    }

    fn assemble(&self, input: &AssemblyInput<'_>) -> Artifact {
        let mut artifact = Artifact::new(AppType::Gemini);
        artifact.insert_text(self.config_file_name(), pretty_json(&Self::settings(input)));
        add_prompt_file(&mut artifact, input);
        artifact
    }
}
