//! Structural inspection of values.
//!
//! Every type that takes part in a comparison describes itself as a
//! [`Shape`]: a record of named fields, an optional reference, an ordered
//! sequence, a ground scalar, an unordered map, an open-ended value, or a
//! field with a registered comparison [`Policy`]. The engine walks these
//! shapes instead of inspecting types at runtime.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::policy::Policy;

/// Placeholder rendered in place of opaque values.
pub const REDACTED: &str = "<redacted>";

/// A value that can be compared structurally.
pub trait Inspect {
    /// Describes this value's structure.
    fn shape(&self) -> Shape<'_>;
}

/// A named field of a record.
pub type Field<'a> = (&'static str, &'a dyn Inspect);

/// Structure of a value, borrowed from it.
pub enum Shape<'a> {
    /// Composite record; compared field by field.
    Record(Vec<Field<'a>>),
    /// Optional single-owned value.
    Reference(Option<&'a dyn Inspect>),
    /// Ordered sequence; compared index by index.
    Sequence(Vec<&'a dyn Inspect>),
    /// Ground value; compared for equality.
    Scalar(Scalar<'a>),
    /// Free-form key-value bag. Not diffable without a policy.
    Unordered(Vec<(String, &'a dyn Inspect)>),
    /// Open-ended value of unknown structure. Not diffable.
    Open(Value),
    /// Field type with a registered comparison policy.
    Policy(Policy<'a>),
}

/// A ground value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar<'a> {
    /// String value.
    Str(&'a str),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
}

impl Shape<'_> {
    /// Short description of the shape, for error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Reference(_) => "reference",
            Self::Sequence(_) => "sequence",
            Self::Scalar(_) => "scalar",
            Self::Unordered(_) => "unordered map",
            Self::Open(_) => "open-ended value",
            Self::Policy(_) => "policy field",
        }
    }
}

impl From<Scalar<'_>> for Value {
    fn from(scalar: Scalar<'_>) -> Self {
        match scalar {
            Scalar::Str(s) => Self::String(s.to_string()),
            Scalar::Int(i) => Self::from(i),
            Scalar::Bool(b) => Self::Bool(b),
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Renders a value as JSON for inclusion in a difference.
///
/// Opaque policy fields render as [`REDACTED`].
#[must_use]
pub fn render(node: &dyn Inspect) -> Value {
    match node.shape() {
        Shape::Record(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, field)| (name.to_string(), render(field)))
                .collect(),
        ),
        Shape::Reference(inner) => inner.map_or(Value::Null, render),
        Shape::Sequence(items) => Value::Array(items.into_iter().map(render).collect()),
        Shape::Scalar(scalar) => scalar.into(),
        Shape::Unordered(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, render(value)))
                .collect::<Map<_, _>>(),
        ),
        Shape::Open(value) => value,
        Shape::Policy(policy) => policy.render(),
    }
}

/// Implements [`Inspect`] for a struct as a record of the listed fields.
///
/// Field names are the manifest spelling and become path segments.
macro_rules! inspect_record {
    ($ty:ident { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::diff::Inspect for $ty {
            fn shape(&self) -> $crate::diff::Shape<'_> {
                $crate::diff::Shape::Record(vec![
                    $(($name, &self.$field as &dyn $crate::diff::Inspect)),*
                ])
            }
        }
    };
}

pub(crate) use inspect_record;

// ============================================================================
// Generic shapes
// ============================================================================

impl<T: Inspect> Inspect for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|item| item as &dyn Inspect).collect())
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Reference(self.as_ref().map(|inner| inner as &dyn Inspect))
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<V: Inspect> Inspect for BTreeMap<String, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Unordered(
            self.iter()
                .map(|(k, v)| (k.clone(), v as &dyn Inspect))
                .collect(),
        )
    }
}

impl<V: Inspect, S> Inspect for HashMap<String, V, S> {
    fn shape(&self) -> Shape<'_> {
        let mut entries: Vec<(String, &dyn Inspect)> = self
            .iter()
            .map(|(k, v)| (k.clone(), v as &dyn Inspect))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Shape::Unordered(entries)
    }
}

impl Inspect for serde_yaml::Value {
    fn shape(&self) -> Shape<'_> {
        Shape::Open(serde_json::to_value(self).unwrap_or(Value::Null))
    }
}

impl Inspect for Value {
    fn shape(&self) -> Shape<'_> {
        Shape::Open(self.clone())
    }
}

impl Inspect for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self.as_str()))
    }
}

impl Inspect for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Bool(*self))
    }
}

macro_rules! inspect_int {
    ($($ty:ty),*) => {
        $(
            impl Inspect for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Scalar::Int(i64::from(*self)))
                }
            }
        )*
    };
}

inspect_int!(i8, i16, i32, i64, u8, u16, u32);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_sequence_of_options() {
        let items = vec![Some(String::from("a")), None];
        assert_eq!(render(&items), json!(["a", null]));
    }

    #[test]
    fn test_render_unordered() {
        let map: BTreeMap<String, i32> = [(String::from("b"), 2), (String::from("a"), 1)].into();
        assert_eq!(render(&map), json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Str("x").to_string(), "x");
        assert_eq!(Scalar::Int(-3).to_string(), "-3");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
    }
}
