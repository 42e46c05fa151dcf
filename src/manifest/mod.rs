//! Manifest loading, parsing and rendering.
//!
//! This module provides:
//! - Multi-document stream parsing with kind dispatch
//! - File and directory loading with a configurable duplicate policy
//! - Rendering objects back to manifest YAML
//! - Content fingerprints for change detection

mod hash;
mod loader;
mod parser;
mod render;

pub use hash::ManifestHasher;
pub use loader::{Loader, MANIFEST_EXTENSIONS};
pub use parser::{parse_document, split_documents, DuplicatePolicy, Parser};
pub use render::{render_object, render_set};
