//! Application settings loaded from `switchboard.toml`.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_settings, parse_settings_str, to_toml};
pub use paths::{SETTINGS_FILE_NAME, default_config_dir, default_data_dir};
pub use schema::{OptimizerSettings, ProbeSettings, Settings};
pub use store::SettingsStore;
