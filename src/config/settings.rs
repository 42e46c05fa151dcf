//! Settings types for the kubediff tool.
//!
//! These map to `kubediff.yaml`. Every key is optional; a missing file or key
//! falls back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::manifest::DuplicatePolicy;

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Report format.
    pub output: OutputFormat,
    /// Whether text output is coloured.
    pub color: bool,
    /// What to do when an identity is declared more than once.
    pub duplicates: DuplicatePolicy,
    /// Log filter directive, e.g. `info` or `kubediff=debug`.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: OutputFormat::Text,
            color: true,
            duplicates: DuplicatePolicy::LastWriteWins,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    String::from("info")
}
