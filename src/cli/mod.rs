//! CLI module for the kubediff tool.
//!
//! This module provides the command-line interface for comparing,
//! exporting and listing manifests.

mod commands;
mod output;

pub use commands::{Cli, Commands};
pub use output::{DiffReport, DifferentObject, OutputFormatter};
