//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::OutputFormat;

/// kubediff - Semantic diffing of Kubernetes manifests.
#[derive(Parser, Debug)]
#[command(name = "kubediff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file.
    #[arg(short, long, global = true, env = "KUBEDIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json). Overrides the settings file.
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two manifest files or directories.
    Diff {
        /// First file or directory.
        a: PathBuf,

        /// Second file or directory.
        b: PathBuf,

        /// Exit with status 1 when differences are found.
        #[arg(long)]
        exit_code: bool,
    },

    /// Print the normalised manifests of a file or directory.
    Export {
        /// File or directory to export.
        path: PathBuf,
    },

    /// List the objects of a file or directory.
    List {
        /// File or directory to list.
        path: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
