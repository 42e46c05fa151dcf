//! Kind-specific object bodies.
//!
//! These mirror the subset of the platform's resource schemas that is worth
//! comparing. Field names follow the manifest spelling so that difference
//! paths read like the YAML they point into.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::diff::{inspect_record, Inspect, Scalar, Shape};

use super::object::{BaseObject, Resource};

// ============================================================================
// Objects
// ============================================================================

/// A Deployment: a replicated pod template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Identity and provenance.
    #[serde(skip)]
    pub base: BaseObject,
    /// Deployment specification.
    #[serde(default)]
    pub spec: DeploymentSpec,
}

/// Deployment specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Desired number of pods.
    #[serde(default = "default_replicas")]
    pub replicas: i32,
    /// Template the pods are created from.
    #[serde(default)]
    pub template: PodTemplate,
}

/// A Service: a stable address in front of selected pods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Identity and provenance.
    #[serde(skip)]
    pub base: BaseObject,
    /// Service specification.
    #[serde(default)]
    pub spec: ServiceSpec,
}

/// Service specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Service type (`ClusterIP`, `NodePort`, `LoadBalancer`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub service_type: String,
    /// Exposed ports.
    #[serde(default)]
    pub ports: Vec<ServicePort>,
    /// Label selector for the backing pods.
    #[serde(default)]
    pub selector: Selector,
}

/// A port exposed by a Service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    /// Port name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Protocol (`TCP`, `UDP`, ...).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    /// Port number on the service.
    #[serde(default)]
    pub port: i32,
    /// Port number or name on the pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<IntOrString>,
    /// Port on each node, for node-port services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_port: Option<i32>,
}

/// A Secret: named opaque blobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Identity and provenance.
    #[serde(skip)]
    pub base: BaseObject,
    /// Secret type tag (e.g. `Opaque`).
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub secret_type: String,
    /// Secret material.
    #[serde(default)]
    pub data: SecretData,
}

/// A `ConfigMap`: named configuration strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMap {
    /// Identity and provenance.
    #[serde(skip)]
    pub base: BaseObject,
    /// Configuration entries.
    #[serde(default)]
    pub data: StringMap,
}

/// A Namespace. Nothing but its identity is compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Identity and provenance.
    #[serde(skip)]
    pub base: BaseObject,
}

// ============================================================================
// Pod template
// ============================================================================

/// Template for the pods of a Deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodTemplate {
    /// Template metadata.
    #[serde(default)]
    pub metadata: TemplateMeta,
    /// Pod specification.
    #[serde(default)]
    pub spec: PodSpec,
}

/// Labels and annotations stamped on templated pods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMeta {
    /// Pod labels.
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub labels: StringMap,
    /// Pod annotations.
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub annotations: StringMap,
}

/// Pod specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    /// Registry credentials to pull images with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<LocalObjectReference>,
    /// Volumes available to containers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    /// Containers in the pod.
    #[serde(default)]
    pub containers: Vec<Container>,
}

/// A reference to another object in the same namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    /// Name of the referenced object.
    #[serde(default)]
    pub name: String,
}

/// A pod volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Volume name.
    #[serde(default)]
    pub name: String,
    /// Secret backing this volume, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretVolumeSource>,
    /// `ConfigMap` backing this volume, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<ConfigMapVolumeSource>,
}

/// Secret volume source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretVolumeSource {
    /// Name of the secret.
    #[serde(default)]
    pub secret_name: String,
}

/// `ConfigMap` volume source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMapVolumeSource {
    /// Name of the config map.
    #[serde(default)]
    pub name: String,
}

/// A container in a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Container name.
    #[serde(default)]
    pub name: String,
    /// Image reference.
    #[serde(default)]
    pub image: String,
    /// Entrypoint override.
    #[serde(default, skip_serializing_if = "Args::is_empty")]
    pub command: Args,
    /// Entrypoint arguments.
    #[serde(default, skip_serializing_if = "Args::is_empty")]
    pub args: Args,
    /// Environment variables.
    #[serde(default, skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    /// Exposed container ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,
    /// Volume mounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
}

/// A port exposed by a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    /// Port number.
    #[serde(default)]
    pub container_port: i32,
    /// Port name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Protocol.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
}

/// A volume mounted into a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    /// Name of the mounted volume.
    #[serde(default)]
    pub name: String,
    /// Mount point inside the container.
    #[serde(default)]
    pub mount_path: String,
    /// Whether the mount is read-only.
    #[serde(default)]
    pub read_only: bool,
}

// ============================================================================
// Field types with their own comparison policy
// ============================================================================

/// A name to value map compared key by key.
///
/// Used for selectors, template labels and annotations, and config data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringMap(pub BTreeMap<String, String>);

/// Label selector of a Service.
pub type Selector = StringMap;

/// An ordered command line. Position matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(pub Vec<String>);

/// Environment entries: declared as a list, compared as a map by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(pub Vec<EnvEntry>);

/// A single environment variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvEntry {
    /// Variable name.
    pub name: String,
    /// Variable value.
    #[serde(default)]
    pub value: String,
}

/// Secret material. Compared for equality only and never displayed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretData(pub BTreeMap<String, String>);

/// A port given either as a number or as a named port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    /// Numeric port.
    Int(i64),
    /// Named port.
    String(String),
}

const fn default_replicas() -> i32 {
    1
}

impl Default for DeploymentSpec {
    fn default() -> Self {
        Self {
            replicas: default_replicas(),
            template: PodTemplate::default(),
        }
    }
}

impl StringMap {
    /// Returns true if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Args {
    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Args {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl Env {
    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indexes the entries by name. A later entry overwrites an earlier one
    /// with the same name, as it does at runtime.
    #[must_use]
    pub fn by_name(&self) -> BTreeMap<&str, &str> {
        self.0
            .iter()
            .map(|e| (e.name.as_str(), e.value.as_str()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| EnvEntry {
                    name: name.into(),
                    value: value.into(),
                })
                .collect(),
        )
    }
}

impl fmt::Debug for SecretData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl fmt::Display for IntOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// Identity
// ============================================================================

impl Resource for Deployment {
    fn base(&self) -> &BaseObject {
        &self.base
    }
}

impl Resource for Service {
    fn base(&self) -> &BaseObject {
        &self.base
    }
}

impl Resource for Secret {
    fn base(&self) -> &BaseObject {
        &self.base
    }
}

impl Resource for ConfigMap {
    fn base(&self) -> &BaseObject {
        &self.base
    }
}

impl Resource for Namespace {
    fn base(&self) -> &BaseObject {
        &self.base
    }
}

// ============================================================================
// Structure for diffing. Identity is not part of it: objects are only
// compared once their identities match.
// ============================================================================

inspect_record!(Deployment { "spec" => spec });
inspect_record!(DeploymentSpec { "replicas" => replicas, "template" => template });
inspect_record!(PodTemplate { "metadata" => metadata, "spec" => spec });
inspect_record!(TemplateMeta { "labels" => labels, "annotations" => annotations });
inspect_record!(PodSpec {
    "imagePullSecrets" => image_pull_secrets,
    "volumes" => volumes,
    "containers" => containers,
});
inspect_record!(LocalObjectReference { "name" => name });
inspect_record!(Volume { "name" => name, "secret" => secret, "configMap" => config_map });
inspect_record!(SecretVolumeSource { "secretName" => secret_name });
inspect_record!(ConfigMapVolumeSource { "name" => name });
inspect_record!(Container {
    "name" => name,
    "image" => image,
    "command" => command,
    "args" => args,
    "env" => env,
    "ports" => ports,
    "volumeMounts" => volume_mounts,
});
inspect_record!(ContainerPort { "containerPort" => container_port, "name" => name, "protocol" => protocol });
inspect_record!(VolumeMount { "name" => name, "mountPath" => mount_path, "readOnly" => read_only });
inspect_record!(Service { "spec" => spec });
inspect_record!(ServiceSpec { "type" => service_type, "ports" => ports, "selector" => selector });
inspect_record!(ServicePort {
    "name" => name,
    "protocol" => protocol,
    "port" => port,
    "targetPort" => target_port,
    "nodePort" => node_port,
});
inspect_record!(Secret { "type" => secret_type, "data" => data });
inspect_record!(ConfigMap { "data" => data });
inspect_record!(Namespace {});

impl Inspect for IntOrString {
    fn shape(&self) -> Shape<'_> {
        match self {
            Self::Int(i) => Shape::Scalar(Scalar::Int(*i)),
            Self::String(s) => Shape::Scalar(Scalar::Str(s.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_by_name_last_wins() {
        let env: Env = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        let index = env.by_name();
        assert_eq!(index.len(), 2);
        assert_eq!(index["A"], "3");
    }

    #[test]
    fn test_secret_debug_hides_values() {
        let data = SecretData([(String::from("password"), String::from("aHVudGVyMg=="))].into());
        let debug = format!("{data:?}");
        assert!(debug.contains("password"));
        assert!(!debug.contains("aHVudGVyMg=="));
    }

    #[test]
    fn test_int_or_string_deserialize() {
        let port: ServicePort = serde_yaml::from_str("port: 80\ntargetPort: http\n").unwrap();
        assert_eq!(port.target_port, Some(IntOrString::String(String::from("http"))));

        let port: ServicePort = serde_yaml::from_str("port: 80\ntargetPort: 8080\n").unwrap();
        assert_eq!(port.target_port, Some(IntOrString::Int(8080)));
    }

    #[test]
    fn test_replicas_default() {
        let spec: DeploymentSpec = serde_yaml::from_str("template: {}\n").unwrap();
        assert_eq!(spec.replicas, 1);
    }
}
