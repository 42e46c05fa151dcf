//! Rendering objects back to manifest YAML.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::{KubeDiffError, ManifestError, Result};
use crate::resource::{Object, ObjectSet, Resource};

/// Renders one object as a manifest document.
///
/// The document carries `apiVersion`, `kind` and `metadata` followed by the
/// kind-specific body.
///
/// # Errors
///
/// Returns [`ManifestError::Render`] if the body cannot be serialized.
pub fn render_object(object: &Object) -> Result<String> {
    serde_yaml::to_string(&to_document(object)?).map_err(render_error)
}

/// Renders a set as a multi-document stream in identity order.
///
/// # Errors
///
/// Returns [`ManifestError::Render`] if any object cannot be serialized.
pub fn render_set(set: &ObjectSet) -> Result<String> {
    let docs = set.iter().map(render_object).collect::<Result<Vec<_>>>()?;
    Ok(docs.join("---\n"))
}

fn to_document(object: &Object) -> Result<Mapping> {
    let id = object.id();
    let kind = object.kind();

    let mut metadata = Mapping::new();
    metadata.insert("name".into(), id.name.clone().into());
    metadata.insert("namespace".into(), id.namespace.clone().into());

    let mut doc = Mapping::new();
    doc.insert("apiVersion".into(), kind.api_version().into());
    doc.insert("kind".into(), id.kind.clone().into());
    doc.insert("metadata".into(), Value::Mapping(metadata));

    let body = match object {
        Object::Deployment(o) => body_of(o)?,
        Object::Service(o) => body_of(o)?,
        Object::Secret(o) => body_of(o)?,
        Object::ConfigMap(o) => body_of(o)?,
        Object::Namespace(o) => body_of(o)?,
    };
    doc.extend(body);
    Ok(doc)
}

fn body_of(body: &impl Serialize) -> Result<Mapping> {
    match serde_yaml::to_value(body).map_err(render_error)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(ManifestError::Render {
            message: format!("expected a mapping, got {other:?}"),
        }
        .into()),
    }
}

fn render_error(e: serde_yaml::Error) -> KubeDiffError {
    ManifestError::Render {
        message: e.to_string(),
    }
    .into()
}
