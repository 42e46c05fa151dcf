//! Objects and object sets.

use std::collections::BTreeMap;

use crate::diff::Inspect;

use super::id::{ObjectId, ResourceKind};
use super::kinds::{ConfigMap, Deployment, Namespace, Secret, Service};

/// Identity and provenance shared by every object.
///
/// Each kind owns one of these and exposes it through [`Resource`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseObject {
    /// Identity of the object.
    pub id: ObjectId,
    /// Where the object came from (a file path, or a live cluster).
    pub source: String,
}

impl BaseObject {
    /// Creates a base for the given identity and provenance.
    #[must_use]
    pub fn new(id: ObjectId, source: impl Into<String>) -> Self {
        Self {
            id,
            source: source.into(),
        }
    }
}

/// Identity and provenance capability.
pub trait Resource {
    /// The embedded base object.
    fn base(&self) -> &BaseObject;

    /// Identity of the object.
    fn id(&self) -> &ObjectId {
        &self.base().id
    }

    /// Where the object came from.
    fn source(&self) -> &str {
        &self.base().source
    }
}

/// A typed manifest object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    /// A Deployment.
    Deployment(Deployment),
    /// A Service.
    Service(Service),
    /// A Secret.
    Secret(Secret),
    /// A `ConfigMap`.
    ConfigMap(ConfigMap),
    /// A Namespace.
    Namespace(Namespace),
}

impl Object {
    /// The concrete kind of this object.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Deployment(_) => ResourceKind::Deployment,
            Self::Service(_) => ResourceKind::Service,
            Self::Secret(_) => ResourceKind::Secret,
            Self::ConfigMap(_) => ResourceKind::ConfigMap,
            Self::Namespace(_) => ResourceKind::Namespace,
        }
    }

    /// The kind-specific body, for structural comparison.
    #[must_use]
    pub fn body(&self) -> &dyn Inspect {
        match self {
            Self::Deployment(o) => o,
            Self::Service(o) => o,
            Self::Secret(o) => o,
            Self::ConfigMap(o) => o,
            Self::Namespace(o) => o,
        }
    }

    /// Mutable access to the base object.
    pub fn base_mut(&mut self) -> &mut BaseObject {
        match self {
            Self::Deployment(o) => &mut o.base,
            Self::Service(o) => &mut o.base,
            Self::Secret(o) => &mut o.base,
            Self::ConfigMap(o) => &mut o.base,
            Self::Namespace(o) => &mut o.base,
        }
    }
}

impl Resource for Object {
    fn base(&self) -> &BaseObject {
        match self {
            Self::Deployment(o) => o.base(),
            Self::Service(o) => o.base(),
            Self::Secret(o) => o.base(),
            Self::ConfigMap(o) => o.base(),
            Self::Namespace(o) => o.base(),
        }
    }
}

impl From<Deployment> for Object {
    fn from(o: Deployment) -> Self {
        Self::Deployment(o)
    }
}

impl From<Service> for Object {
    fn from(o: Service) -> Self {
        Self::Service(o)
    }
}

impl From<Secret> for Object {
    fn from(o: Secret) -> Self {
        Self::Secret(o)
    }
}

impl From<ConfigMap> for Object {
    fn from(o: ConfigMap) -> Self {
        Self::ConfigMap(o)
    }
}

impl From<Namespace> for Object {
    fn from(o: Namespace) -> Self {
        Self::Namespace(o)
    }
}

/// A named collection of objects keyed by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSet {
    /// Provenance label for the whole set.
    pub source: String,
    /// Objects by identity. At most one object per identity.
    pub objects: BTreeMap<ObjectId, Object>,
}

impl ObjectSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            objects: BTreeMap::new(),
        }
    }

    /// Inserts an object under its identity, returning any object it
    /// replaced.
    pub fn insert(&mut self, object: Object) -> Option<Object> {
        self.objects.insert(object.id().clone(), object)
    }

    /// Looks up an object by identity.
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    /// Returns true if an object with this identity is present.
    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the set has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates objects in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }
}

impl<'a> IntoIterator for &'a ObjectSet {
    type Item = &'a Object;
    type IntoIter = std::collections::btree_map::Values<'a, ObjectId, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, source: &str) -> Object {
        Object::from(Service {
            base: BaseObject::new(ObjectId::new("default", "Service", name), source),
            ..Service::default()
        })
    }

    #[test]
    fn test_identity_delegates_to_base() {
        let obj = service("web", "web.yaml");
        assert_eq!(obj.id().name, "web");
        assert_eq!(obj.source(), "web.yaml");
        assert_eq!(obj.kind(), ResourceKind::Service);
    }

    #[test]
    fn test_insert_replaces_same_identity() {
        let mut set = ObjectSet::new("test");
        assert!(set.insert(service("web", "a.yaml")).is_none());
        let replaced = set.insert(service("web", "b.yaml"));

        assert_eq!(replaced.map(|o| o.source().to_string()), Some(String::from("a.yaml")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(Resource::source), Some("b.yaml"));
    }
}
