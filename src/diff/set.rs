//! Comparison of whole object sets.

use std::collections::BTreeMap;
use tracing::debug;

use crate::error::Result;
use crate::resource::{Object, ObjectId, ObjectSet, Resource};

use super::difference::Difference;
use super::engine::diff_object;

/// Result of comparing two object sets.
///
/// Every identity in either set lands in exactly one of `only_a`, `only_b`
/// or `different`, unless it is present in both sets and identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSetDiff<'a> {
    /// Provenance of the left set.
    pub source_a: &'a str,
    /// Provenance of the right set.
    pub source_b: &'a str,
    /// Objects only in the left set, in identity order.
    pub only_a: Vec<&'a Object>,
    /// Objects only in the right set, in identity order.
    pub only_b: Vec<&'a Object>,
    /// Differences for identities present in both sets. Entries are never
    /// empty.
    pub different: BTreeMap<ObjectId, Vec<Difference>>,
}

impl ObjectSetDiff<'_> {
    /// Returns true if the sets differ in any way.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.only_a.is_empty() || !self.only_b.is_empty() || !self.different.is_empty()
    }

    /// Number of objects that are missing on one side or differ.
    #[must_use]
    pub fn total(&self) -> usize {
        self.only_a.len() + self.only_b.len() + self.different.len()
    }
}

/// Compares two object sets.
///
/// # Errors
///
/// Fails with the first comparison error encountered; no partial result is
/// returned.
pub fn diff_set<'a>(a: &'a ObjectSet, b: &'a ObjectSet) -> Result<ObjectSetDiff<'a>> {
    let mut diff = ObjectSetDiff {
        source_a: &a.source,
        source_b: &b.source,
        only_a: Vec::new(),
        only_b: Vec::new(),
        different: BTreeMap::new(),
    };

    for obj_a in a {
        match b.get(obj_a.id()) {
            Some(obj_b) => {
                let diffs = diff_object(obj_a, obj_b)?;
                if !diffs.is_empty() {
                    diff.different.insert(obj_a.id().clone(), diffs);
                }
            }
            None => diff.only_a.push(obj_a),
        }
    }

    diff.only_b = b.iter().filter(|obj| !a.contains(obj.id())).collect();

    debug!(
        "Compared {} with {}: {} only in first, {} only in second, {} different",
        a.source,
        b.source,
        diff.only_a.len(),
        diff.only_b.len(),
        diff.different.len()
    );

    Ok(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompareError, KubeDiffError};
    use crate::resource::{BaseObject, ConfigMap, Deployment, Namespace, Service, StringMap};

    fn config_map(name: &str, data: &[(&str, &str)]) -> Object {
        Object::from(ConfigMap {
            base: BaseObject::new(ObjectId::new("default", "ConfigMap", name), "test"),
            data: data.iter().copied().collect::<StringMap>(),
        })
    }

    fn set(source: &str, objects: Vec<Object>) -> ObjectSet {
        let mut set = ObjectSet::new(source);
        for obj in objects {
            set.insert(obj);
        }
        set
    }

    #[test]
    fn test_identical_sets() {
        let a = set("a", vec![config_map("x", &[("k", "v")])]);
        let b = a.clone();
        let diff = diff_set(&a, &b).unwrap();
        assert!(!diff.has_changes());
        assert_eq!(diff.total(), 0);
    }

    #[test]
    fn test_partition() {
        let a = set(
            "a",
            vec![
                config_map("same", &[("k", "v")]),
                config_map("changed", &[("k", "1")]),
                config_map("gone", &[]),
            ],
        );
        let b = set(
            "b",
            vec![
                config_map("same", &[("k", "v")]),
                config_map("changed", &[("k", "2")]),
                config_map("new", &[]),
            ],
        );

        let diff = diff_set(&a, &b).unwrap();
        assert_eq!(diff.source_a, "a");
        assert_eq!(diff.source_b, "b");
        assert_eq!(diff.only_a.len(), 1);
        assert_eq!(diff.only_a[0].id().name, "gone");
        assert_eq!(diff.only_b.len(), 1);
        assert_eq!(diff.only_b[0].id().name, "new");

        let changed = ObjectId::new("default", "ConfigMap", "changed");
        assert_eq!(diff.different.len(), 1);
        assert_eq!(
            diff.different[&changed],
            vec![Difference::changed(".data[k]", "1", "2")]
        );
        assert!(!diff.different.contains_key(&ObjectId::new("default", "ConfigMap", "same")));
        assert_eq!(diff.total(), 3);
    }

    #[test]
    fn test_every_identity_accounted_for() {
        let a = set("a", vec![config_map("p", &[]), config_map("q", &[("x", "1")])]);
        let b = set("b", vec![config_map("q", &[("x", "2")]), config_map("r", &[])]);
        let diff = diff_set(&a, &b).unwrap();

        for id in a.objects.keys().chain(b.objects.keys()) {
            let placements = usize::from(diff.only_a.iter().any(|o| o.id() == id))
                + usize::from(diff.only_b.iter().any(|o| o.id() == id))
                + usize::from(diff.different.contains_key(id));
            assert_eq!(placements, 1, "{id} placed {placements} times");
        }
    }

    #[test]
    fn test_service_selector_added() {
        let service = |selector: &[(&str, &str)]| {
            let mut svc = Service {
                base: BaseObject::new(ObjectId::new("default", "Service", "web"), "test"),
                ..Service::default()
            };
            svc.spec.selector = selector.iter().copied().collect();
            Object::from(svc)
        };
        let a = set("a", vec![service(&[("app", "foo")])]);
        let b = set("b", vec![service(&[("app", "foo"), ("tier", "backend")])]);

        let diff = diff_set(&a, &b).unwrap();
        let diffs = &diff.different[&ObjectId::new("default", "Service", "web")];
        assert_eq!(diffs, &vec![Difference::added(".spec.selector[tier]", "backend")]);
    }

    #[test]
    fn test_fails_fast_on_type_mismatch() {
        let id = ObjectId::new("default", "Namespace", "clash");
        let a = set(
            "a",
            vec![Object::from(Namespace {
                base: BaseObject::new(id.clone(), "a"),
            })],
        );
        let b = set(
            "b",
            vec![Object::from(Deployment {
                base: BaseObject::new(id, "b"),
                ..Deployment::default()
            })],
        );

        assert!(matches!(
            diff_set(&a, &b),
            Err(KubeDiffError::Compare(CompareError::TypeMismatch { .. }))
        ));
    }
}
