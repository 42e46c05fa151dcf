//! Manifest fingerprints for change detection.
//!
//! A fingerprint is the SHA-256 of an object's rendered manifest, so two
//! objects with the same identity and content always share one regardless of
//! how their source documents were formatted.

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::resource::{Object, ObjectSet};

use super::render::render_object;

/// Hasher for computing manifest fingerprints.
#[derive(Debug, Default)]
pub struct ManifestHasher;

impl ManifestHasher {
    /// Creates a new manifest hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the fingerprint of a single object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be rendered.
    pub fn fingerprint(&self, object: &Object) -> Result<String> {
        let rendered = render_object(object)?;
        Ok(hex::encode(Sha256::digest(rendered.as_bytes())))
    }

    /// Computes a fingerprint over every object of a set, in identity order.
    ///
    /// # Errors
    ///
    /// Returns an error if any object cannot be rendered.
    pub fn fingerprint_set(&self, set: &ObjectSet) -> Result<String> {
        let mut hasher = Sha256::new();
        for object in set {
            hasher.update(self.fingerprint(object)?.as_bytes());
        }
        Ok(hex::encode(hasher.finalize()))
    }

    /// Returns a short prefix of a fingerprint, for display.
    #[must_use]
    pub fn short_hash(hash: &str) -> &str {
        hash.get(..8).unwrap_or(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Parser;
    use crate::resource::{ObjectId, Resource};

    fn parse(input: &str) -> ObjectSet {
        Parser::new().parse(input, "test").unwrap()
    }

    #[test]
    fn test_fingerprint_ignores_formatting() {
        let a = parse("kind: ConfigMap\nmetadata: {name: c}\ndata: {x: '1', y: '2'}\n");
        let b = parse("# comment\nkind: ConfigMap\nmetadata:\n  namespace: default\n  name: c\ndata:\n  y: '2'\n  x: '1'\n");
        let hasher = ManifestHasher::new();

        assert_eq!(hasher.fingerprint_set(&a).unwrap(), hasher.fingerprint_set(&b).unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let a = parse("kind: ConfigMap\nmetadata: {name: c}\ndata: {x: '1'}\n");
        let b = parse("kind: ConfigMap\nmetadata: {name: c}\ndata: {x: '2'}\n");
        let id = ObjectId::new("default", "ConfigMap", "c");
        let hasher = ManifestHasher::new();

        let hash_a = hasher.fingerprint(a.get(&id).unwrap()).unwrap();
        let hash_b = hasher.fingerprint(b.get(&id).unwrap()).unwrap();
        assert_ne!(hash_a, hash_b);
        assert_eq!(hash_a.len(), 64);
        assert_eq!(a.get(&id).map(|o| o.id().name.as_str()), Some("c"));
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(ManifestHasher::short_hash("0123456789abcdef"), "01234567");
        assert_eq!(ManifestHasher::short_hash("abc"), "abc");
    }
}
