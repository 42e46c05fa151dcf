//! Individual differences between two objects.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One difference between two versions of an object.
///
/// `path` locates the difference inside the object, e.g.
/// `.spec.template.spec.containers[0].env[FOO]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Difference {
    /// A value present on both sides differs.
    Changed {
        /// Location of the value.
        path: String,
        /// Value on the left side.
        old: Value,
        /// Value on the right side.
        new: Value,
    },
    /// A value is only present on the right side.
    Added {
        /// Location of the value.
        path: String,
        /// The added value.
        value: Value,
    },
    /// A value is only present on the left side.
    Removed {
        /// Location of the value.
        path: String,
        /// The removed value.
        value: Value,
    },
    /// An opaque value differs. Neither side is disclosed.
    OpaqueChanged {
        /// Location of the value.
        path: String,
    },
}

impl Difference {
    /// Creates a change between two values.
    #[must_use]
    pub fn changed(path: impl Into<String>, old: impl Into<Value>, new: impl Into<Value>) -> Self {
        Self::Changed {
            path: path.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    /// Creates an addition.
    #[must_use]
    pub fn added(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Added {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Creates a removal.
    #[must_use]
    pub fn removed(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Removed {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Creates an opaque change.
    #[must_use]
    pub fn opaque_changed(path: impl Into<String>) -> Self {
        Self::OpaqueChanged { path: path.into() }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed { path, old, new } => {
                write!(f, "{path}: {} != {}", DisplayValue(old), DisplayValue(new))
            }
            Self::Added { path, value } => write!(f, "+ {path}: {}", DisplayValue(value)),
            Self::Removed { path, value } => write!(f, "- {path}: {}", DisplayValue(value)),
            Self::OpaqueChanged { path } => write!(f, "{path}: data has changed"),
        }
    }
}

/// Strings print bare; everything else prints as compact JSON.
struct DisplayValue<'a>(&'a Value);

impl fmt::Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_forms() {
        assert_eq!(Difference::changed(".spec.replicas", 1, 3).to_string(), ".spec.replicas: 1 != 3");
        assert_eq!(Difference::added(".spec.selector[tier]", "backend").to_string(), "+ .spec.selector[tier]: backend");
        assert_eq!(Difference::removed(".args[2]", "baz").to_string(), "- .args[2]: baz");
        assert_eq!(Difference::opaque_changed(".data").to_string(), ".data: data has changed");
    }

    #[test]
    fn test_display_composite_value() {
        let d = Difference::added(".ports[1]", json!({ "port": 443 }));
        assert_eq!(d.to_string(), r#"+ .ports[1]: {"port":443}"#);
    }

    #[test]
    fn test_serialize_tagged() {
        let value = serde_json::to_value(Difference::opaque_changed(".data")).unwrap();
        assert_eq!(value, json!({ "type": "opaque_changed", "path": ".data" }));
    }
}
