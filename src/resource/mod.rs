//! Typed model of the manifests this engine understands.
//!
//! Every object carries an [`ObjectId`] and a provenance label through its
//! [`BaseObject`]; the kind-specific bodies live in [`kinds`].

mod id;
pub mod kinds;
mod object;

pub use id::{ObjectId, ResourceKind, DEFAULT_NAMESPACE};
pub use kinds::{
    Args, ConfigMap, ConfigMapVolumeSource, Container, ContainerPort, Deployment, DeploymentSpec,
    Env, EnvEntry, IntOrString, LocalObjectReference, Namespace, PodSpec, PodTemplate,
    SecretData, SecretVolumeSource, Secret, Selector, Service, ServicePort, ServiceSpec,
    StringMap, TemplateMeta, Volume, VolumeMount,
};
pub use object::{BaseObject, Object, ObjectSet, Resource};
