//! Error types for the kubediff manifest diffing engine.
//!
//! This module provides the error hierarchy for every stage of a diff:
//! loading and parsing manifests, comparing objects, and reading settings.

use std::path::PathBuf;
use thiserror::Error;

use crate::resource::ObjectId;

/// The main error type for kubediff.
#[derive(Debug, Error)]
pub enum KubeDiffError {
    /// Manifest loading or parsing errors.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Object comparison errors.
    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    /// Settings errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while turning manifest text into objects.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// A document is not valid YAML or does not fit the schema of its kind.
    #[error("Failed to parse document from \"{source_name}\": {message}")]
    Parse {
        /// Where the document came from.
        source_name: String,
        /// Description of the parse error.
        message: String,
    },

    /// A document has no `kind` field.
    #[error("Document from \"{source_name}\" has no kind")]
    MissingKind {
        /// Where the document came from.
        source_name: String,
    },

    /// A document declares a kind this engine does not model.
    #[error("Unknown object kind {kind} in \"{source_name}\"")]
    UnknownKind {
        /// The unrecognized kind.
        kind: String,
        /// Where the document came from.
        source_name: String,
    },

    /// A manifest file or directory could not be read.
    #[error("Failed to read \"{}\": {message}", path.display())]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Description of the IO failure.
        message: String,
    },

    /// Two documents declare the same identity and duplicates are rejected.
    #[error("{id} is declared in both \"{first}\" and \"{second}\"")]
    DuplicateObject {
        /// The repeated identity.
        id: ObjectId,
        /// Source of the first declaration.
        first: String,
        /// Source of the second declaration.
        second: String,
    },

    /// An object could not be rendered back to YAML.
    #[error("Failed to render manifest: {message}")]
    Render {
        /// Description of the serialization error.
        message: String,
    },
}

/// Errors raised while comparing two objects.
#[derive(Debug, Error)]
pub enum CompareError {
    /// The objects have different identities.
    #[error("objects do not represent the same resource: {a} vs {b}")]
    IdentityMismatch {
        /// Identity of the left object.
        a: ObjectId,
        /// Identity of the right object.
        b: ObjectId,
    },

    /// The objects share an identity but are different kinds of object.
    #[error("objects for {id} are not the same kind: {a_kind} vs {b_kind}")]
    TypeMismatch {
        /// The shared identity.
        id: ObjectId,
        /// Kind of the left object.
        a_kind: String,
        /// Kind of the right object.
        b_kind: String,
    },

    /// A value has no defined comparison semantics.
    #[error("{shape} at \"{path}\" is not diffable")]
    NotDiffable {
        /// Location of the value.
        path: String,
        /// Description of the value's shape.
        shape: String,
    },

    /// Two values at the same location have incompatible structure.
    #[error("values at \"{path}\" have different structure")]
    ShapeMismatch {
        /// Location of the values.
        path: String,
    },
}

/// Settings-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested settings file was not found.
    #[error("Settings file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The settings file could not be parsed.
    #[error("Failed to parse settings: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// A setting override has a value that cannot be interpreted.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        /// Name of the setting or environment variable.
        name: String,
        /// The rejected value.
        value: String,
    },
}

/// Result type alias for kubediff operations.
pub type Result<T> = std::result::Result<T, KubeDiffError>;

impl KubeDiffError {
    /// Returns true if retrying the same call might succeed.
    ///
    /// Only IO failures qualify; parse and comparison failures are a
    /// property of the inputs.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Manifest(ManifestError::Read { .. })
        )
    }
}

impl ManifestError {
    /// Creates a parse error for a document from the given source.
    #[must_use]
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a read error for the given path.
    #[must_use]
    pub fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl CompareError {
    /// Creates a not-diffable error for a value at `path`.
    #[must_use]
    pub fn not_diffable(path: impl Into<String>, shape: impl Into<String>) -> Self {
        Self::NotDiffable {
            path: path.into(),
            shape: shape.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_names_kind() {
        let err = KubeDiffError::from(ManifestError::UnknownKind {
            kind: String::from("Widget"),
            source_name: String::from("widgets.yaml"),
        });
        assert!(err.to_string().contains("Widget"));
    }

    #[test]
    fn test_identity_mismatch_message() {
        let err = CompareError::IdentityMismatch {
            a: ObjectId::new("default", "Service", "a"),
            b: ObjectId::new("default", "Service", "b"),
        };
        assert!(err.to_string().contains("do not represent the same resource"));
    }

    #[test]
    fn test_retryable() {
        let io = KubeDiffError::from(std::io::Error::other("disk"));
        assert!(io.is_retryable());

        let parse = KubeDiffError::from(ManifestError::parse("x", "bad"));
        assert!(!parse.is_retryable());
    }
}
