//! Loading manifests from files and directories.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{ManifestError, Result};
use crate::resource::ObjectSet;

use super::parser::{DuplicatePolicy, Parser};

/// File extensions considered manifests.
pub const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Loads object sets from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    duplicates: DuplicatePolicy,
}

impl Loader {
    /// Creates a loader with the default duplicate policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            duplicates: DuplicatePolicy::LastWriteWins,
        }
    }

    /// Sets the policy for identities declared more than once.
    #[must_use]
    pub const fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Loads a file or a directory into one object set labelled with `path`.
    ///
    /// Only `.yaml`/`.yml` files are considered, whether `path` names one
    /// file or a directory. A directory is walked recursively in file name
    /// order; symlinked directories are not descended into.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be read or any document fails to
    /// parse.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ObjectSet> {
        let path = path.as_ref();
        info!("Loading manifests from: {}", path.display());

        let files = collect_manifests(path)?;
        if files.is_empty() {
            warn!("No .yaml or .yml manifests found at {}", path.display());
        }
        debug!("Found {} manifest file(s) under {}", files.len(), path.display());

        let mut set = ObjectSet::new(path.display().to_string());
        for file in &files {
            let loaded = self.load_file(file)?;
            for object in loaded.objects.into_values() {
                self.duplicates.insert(&mut set, object)?;
            }
        }

        info!("Loaded {} object(s) from {}", set.len(), path.display());
        Ok(set)
    }

    /// Parses a single manifest file whatever its extension. Objects are
    /// labelled with the file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ObjectSet> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| read_error(path, &e))?;
        self.parse_str(&content, &path.display().to_string())
    }

    /// Parses manifest text that did not come from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if any document fails to parse.
    pub fn parse_str(&self, input: &str, source: &str) -> Result<ObjectSet> {
        Parser::new().with_duplicates(self.duplicates).parse(input, source)
    }
}

fn collect_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            ManifestError::read(e.path().unwrap_or(root), e.to_string())
        })?;
        if !entry.file_type().is_dir() && is_manifest(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}

// Undecodable bytes are a property of the file, not a transient failure.
fn read_error(path: &Path, e: &io::Error) -> ManifestError {
    if e.kind() == io::ErrorKind::InvalidData {
        ManifestError::parse(path.display().to_string(), e.to_string())
    } else {
        ManifestError::read(path, e.to_string())
    }
}
