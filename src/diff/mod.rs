//! Semantic diffing of manifest objects.
//!
//! This module provides:
//! - Structural inspection of object bodies ([`Inspect`], [`Shape`])
//! - Per-field comparison policies ([`Policy`])
//! - Object and set comparison ([`diff_object`], [`diff_set`])
//! - Text rendering of the result ([`Summarizer`])

mod difference;
mod engine;
mod inspect;
mod policy;
mod set;
mod summary;

pub use difference::Difference;
pub use engine::{diff_object, diff_value};
pub use inspect::{render, Field, Inspect, Scalar, Shape, REDACTED};
pub(crate) use inspect::inspect_record;
pub use policy::Policy;
pub use set::{diff_set, ObjectSetDiff};
pub use summary::Summarizer;
