//! OpenCode assembler: `config.json` and `OPENCODE.md`.

use super::{
    Artifact, AssemblyInput, ClientAssembler, GeminiCliAssembler, add_prompt_file, pretty_json,
};
use crate::types::AppType;

/// Same shape as the Gemini settings, written as `config.json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenCodeAssembler;

impl ClientAssembler for OpenCodeAssembler {
    fn app(&self) -> AppType {
        AppType::OpenCode
    }

    fn config_file_name(&self) -> &'static str {
        "config.json"
    }

    fn install_path(&self) -> &'static str {
        "~/.config/opencode/config.json"
    }

    fn assemble(&self, input: &AssemblyInput<'_>) -> Artifact {
        let mut artifact = Artifact::new(AppType::OpenCode);
        artifact.insert_text(
            self.config_file_name(),
            pretty_json(&GeminiCliAssembler::settings(input)),
        );
        add_prompt_file(&mut artifact, input);
        artifact
    }
}
