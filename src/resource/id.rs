//! Object identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace assumed when a manifest does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// The natural key of a manifest resource.
///
/// Field order is significant: the derived ordering sorts by namespace, then
/// kind, then name, which is the order reports are rendered in.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    /// Namespace of the resource.
    pub namespace: String,
    /// Kind of the resource, as written in the manifest.
    pub kind: String,
    /// Name of the resource.
    pub name: String,
}

impl ObjectId {
    /// Creates an identity, substituting [`DEFAULT_NAMESPACE`] for an empty
    /// namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            namespace: if namespace.is_empty() {
                String::from(DEFAULT_NAMESPACE)
            } else {
                namespace
            },
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// The manifest kinds this engine models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    /// `apps/v1` Deployment.
    Deployment,
    /// `v1` Service.
    Service,
    /// `v1` Secret.
    Secret,
    /// `v1` `ConfigMap`.
    ConfigMap,
    /// `v1` Namespace.
    Namespace,
}

impl ResourceKind {
    /// All supported kinds.
    pub const ALL: [Self; 5] = [
        Self::Deployment,
        Self::Service,
        Self::Secret,
        Self::ConfigMap,
        Self::Namespace,
    ];

    /// Looks up a kind by its manifest spelling.
    #[must_use]
    pub fn from_kind(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }

    /// The kind as written in a manifest.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::Service => "Service",
            Self::Secret => "Secret",
            Self::ConfigMap => "ConfigMap",
            Self::Namespace => "Namespace",
        }
    }

    /// The `apiVersion` used when rendering this kind.
    #[must_use]
    pub const fn api_version(self) -> &'static str {
        match self {
            Self::Deployment => "apps/v1",
            Self::Service | Self::Secret | Self::ConfigMap | Self::Namespace => "v1",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_namespace_defaults() {
        let id = ObjectId::new("", "Service", "web");
        assert_eq!(id.namespace, "default");
    }

    #[test]
    fn test_ordering_is_namespace_kind_name() {
        let mut ids = vec![
            ObjectId::new("b", "Deployment", "a"),
            ObjectId::new("a", "Service", "a"),
            ObjectId::new("a", "Deployment", "z"),
        ];
        ids.sort();
        assert_eq!(ids[0], ObjectId::new("a", "Deployment", "z"));
        assert_eq!(ids[1], ObjectId::new("a", "Service", "a"));
        assert_eq!(ids[2], ObjectId::new("b", "Deployment", "a"));
    }

    #[test]
    fn test_kind_lookup() {
        assert_eq!(ResourceKind::from_kind("ConfigMap"), Some(ResourceKind::ConfigMap));
        assert_eq!(ResourceKind::from_kind("Widget"), None);
        assert_eq!(ResourceKind::Deployment.api_version(), "apps/v1");
    }

    #[test]
    fn test_display() {
        let id = ObjectId::new("prod", "Deployment", "api");
        assert_eq!(id.to_string(), "Deployment prod/api");
    }
}
