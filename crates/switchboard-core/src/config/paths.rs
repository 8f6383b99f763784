//! Default locations for settings and record data.

use std::path::PathBuf;

pub const SETTINGS_FILE_NAME: &str = "switchboard.toml";

pub fn default_config_dir() -> anyhow::Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("switchboard"))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    Ok(dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
        .join("switchboard"))
}
