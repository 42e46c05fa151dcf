//! Multi-document manifest parsing.
//!
//! A stream holds zero or more YAML documents separated by `---` lines. Each
//! document is decoded in two passes: first far enough to find its `kind`
//! and `metadata`, then into the typed body for that kind.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ManifestError, Result};
use crate::resource::{
    BaseObject, ConfigMap, Deployment, Namespace, Object, ObjectId, ObjectSet, Resource,
    ResourceKind, Secret, Service,
};

/// What to do when two documents declare the same identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The later declaration replaces the earlier one, with a warning.
    #[default]
    LastWriteWins,
    /// Loading fails with [`ManifestError::DuplicateObject`].
    Reject,
}

impl DuplicatePolicy {
    /// Adds `object` to `set` according to this policy.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::DuplicateObject`] under [`Self::Reject`] if
    /// the identity is already present.
    pub fn insert(self, set: &mut ObjectSet, object: Object) -> Result<()> {
        if self == Self::Reject {
            if let Some(existing) = set.get(object.id()) {
                return Err(ManifestError::DuplicateObject {
                    id: object.id().clone(),
                    first: existing.source().to_string(),
                    second: object.source().to_string(),
                }
                .into());
            }
        }

        let second = object.source().to_string();
        if let Some(replaced) = set.insert(object) {
            warn!(
                "{} declared again in {}, replacing the one from {}",
                replaced.id(),
                second,
                replaced.source()
            );
        }
        Ok(())
    }
}

/// Just enough of a document to know what it is.
#[derive(Debug, Deserialize)]
struct Header {
    kind: Option<String>,
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    namespace: String,
}

/// Parser for multi-document manifest streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    duplicates: DuplicatePolicy,
}

impl Parser {
    /// Creates a parser with the default duplicate policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            duplicates: DuplicatePolicy::LastWriteWins,
        }
    }

    /// Sets the policy for repeated identities within one stream.
    #[must_use]
    pub const fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Parses a stream into an object set labelled `source`.
    ///
    /// Empty input yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if any document is malformed or of an unknown kind.
    pub fn parse(&self, input: &str, source: &str) -> Result<ObjectSet> {
        let mut set = ObjectSet::new(source);
        for doc in split_documents(input) {
            let object = parse_document(doc, source)?;
            debug!("Parsed {} from {}", object.id(), source);
            self.duplicates.insert(&mut set, object)?;
        }
        Ok(set)
    }
}

/// Decodes a single document into a typed object.
///
/// # Errors
///
/// Returns [`ManifestError::MissingKind`] or [`ManifestError::UnknownKind`]
/// if the kind cannot be dispatched, or [`ManifestError::Parse`] if the
/// document does not decode.
pub fn parse_document(doc: &str, source: &str) -> Result<Object> {
    let header: Header =
        serde_yaml::from_str(doc).map_err(|e| ManifestError::parse(source, e.to_string()))?;

    let kind_name = header.kind.ok_or_else(|| ManifestError::MissingKind {
        source_name: source.to_string(),
    })?;
    let kind = ResourceKind::from_kind(&kind_name).ok_or_else(|| ManifestError::UnknownKind {
        kind: kind_name.clone(),
        source_name: source.to_string(),
    })?;

    let mut object = match kind {
        ResourceKind::Deployment => decode::<Deployment>(doc, source)?,
        ResourceKind::Service => decode::<Service>(doc, source)?,
        ResourceKind::Secret => decode::<Secret>(doc, source)?,
        ResourceKind::ConfigMap => decode::<ConfigMap>(doc, source)?,
        ResourceKind::Namespace => decode::<Namespace>(doc, source)?,
    };

    let id = ObjectId::new(header.metadata.namespace, kind_name, header.metadata.name);
    *object.base_mut() = BaseObject::new(id, source);
    Ok(object)
}

fn decode<T>(doc: &str, source: &str) -> Result<Object>
where
    T: DeserializeOwned + Into<Object>,
{
    let body: T =
        serde_yaml::from_str(doc).map_err(|e| ManifestError::parse(source, e.to_string()))?;
    Ok(body.into())
}

/// Splits a stream into documents.
///
/// A separator is a line starting with `---` followed by nothing, whitespace
/// or a comment. The final chunk needs no trailing separator. Chunks holding
/// only blank lines and comments are dropped.
#[must_use]
pub fn split_documents(input: &str) -> Vec<&str> {
    let mut docs = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in input.split_inclusive('\n') {
        if is_separator(line) {
            push_document(&mut docs, &input[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    push_document(&mut docs, &input[start..]);
    docs
}

fn is_separator(line: &str) -> bool {
    line.strip_prefix("---").is_some_and(|rest| {
        let rest = rest.trim_start();
        rest.is_empty() || rest.starts_with('#')
    })
}

fn push_document<'a>(docs: &mut Vec<&'a str>, chunk: &'a str) {
    let has_content = chunk.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if has_content {
        docs.push(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KubeDiffError;

    const DEPLOYMENT: &str = r"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: helloworld
  namespace: demo
spec:
  replicas: 2
  template:
    metadata:
      labels:
        name: helloworld
    spec:
      containers:
      - name: greeter
        image: quay.io/example/helloworld:master-a000001
        args:
        - -msg=Ahoy
        - -port=80
        env:
        - name: GREETING
          value: hello
        ports:
        - containerPort: 80
";

    const SERVICE: &str = r"
kind: Service
metadata:
  name: helloworld
spec:
  type: NodePort
  ports:
  - port: 80
    targetPort: http
  selector:
    name: helloworld
";

    fn parse(input: &str) -> Result<ObjectSet> {
        Parser::new().parse(input, "test.yaml")
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("---\n# nothing here\n---\n").unwrap().is_empty());
    }

    #[test]
    fn test_split_unterminated_last_document() {
        let docs = split_documents("kind: A\n---\nkind: B");
        assert_eq!(docs, vec!["kind: A\n", "kind: B"]);
    }

    #[test]
    fn test_split_leading_separator_and_comments() {
        let docs = split_documents("---\nkind: A\n--- # next\nkind: B\n---\n");
        assert_eq!(docs, vec!["kind: A\n", "kind: B\n"]);
    }

    #[test]
    fn test_split_ignores_indented_dashes() {
        let docs = split_documents("kind: A\ndata:\n  x: |\n    ---\n");
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_parse_multidoc() {
        let input = format!("{DEPLOYMENT}---{SERVICE}");
        let set = parse(&input).unwrap();
        assert_eq!(set.len(), 2);

        let id = ObjectId::new("demo", "Deployment", "helloworld");
        let Some(Object::Deployment(deployment)) = set.get(&id) else {
            panic!("deployment not parsed");
        };
        assert_eq!(deployment.spec.replicas, 2);
        let container = &deployment.spec.template.spec.containers[0];
        assert_eq!(container.args.0, vec!["-msg=Ahoy", "-port=80"]);
        assert_eq!(container.env.by_name()["GREETING"], "hello");
        assert_eq!(deployment.source(), "test.yaml");
    }

    #[test]
    fn test_missing_namespace_defaults() {
        let set = parse(SERVICE).unwrap();
        assert!(set.contains(&ObjectId::new("default", "Service", "helloworld")));
    }

    #[test]
    fn test_unknown_kind() {
        let err = parse("kind: Widget\nmetadata:\n  name: w\n").unwrap_err();
        assert!(matches!(
            err,
            KubeDiffError::Manifest(ManifestError::UnknownKind { ref kind, .. }) if kind == "Widget"
        ));
        assert!(err.to_string().contains("Widget"));
    }

    #[test]
    fn test_missing_kind() {
        let err = parse("metadata:\n  name: w\n").unwrap_err();
        assert!(matches!(err, KubeDiffError::Manifest(ManifestError::MissingKind { .. })));
    }

    #[test]
    fn test_malformed_document() {
        let err = parse("kind: Deployment\nspec:\n  replicas: many\n").unwrap_err();
        assert!(matches!(err, KubeDiffError::Manifest(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_duplicate_in_stream() {
        let input = "kind: ConfigMap\nmetadata:\n  name: c\ndata:\n  k: '1'\n---\nkind: ConfigMap\nmetadata:\n  name: c\ndata:\n  k: '2'\n";

        let set = parse(input).unwrap();
        let Some(Object::ConfigMap(cm)) = set.get(&ObjectId::new("default", "ConfigMap", "c")) else {
            panic!("config map not parsed");
        };
        assert_eq!(cm.data.get("k"), Some("2"));

        let err = Parser::new()
            .with_duplicates(DuplicatePolicy::Reject)
            .parse(input, "test.yaml")
            .unwrap_err();
        assert!(matches!(err, KubeDiffError::Manifest(ManifestError::DuplicateObject { .. })));
    }
}
