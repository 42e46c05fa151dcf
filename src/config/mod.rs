//! Settings for the kubediff tool.
//!
//! This module handles:
//! - Parsing and deserializing `kubediff.yaml`
//! - Discovering the settings file
//! - Environment variable and `.env` overrides

mod loader;
mod settings;

pub use loader::{apply_env_overrides, find_settings_file, SettingsLoader, DEFAULT_SETTINGS_FILES};
pub use settings::{OutputFormat, Settings};
