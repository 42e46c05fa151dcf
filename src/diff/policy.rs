//! Registered comparison policies.
//!
//! A handful of field types carry meaning the generic structural walk would
//! get wrong. Each of them reports [`Shape::Policy`] and is compared here
//! instead of being recursed into:
//!
//! | Type | Policy |
//! |---|---|
//! | [`StringMap`] (selectors, labels, config data) | keyed diff |
//! | [`Env`] | index by name (last wins), then keyed diff |
//! | [`Args`] | positional line diff |
//! | [`SecretData`] | equality only, reported as opaque |

use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{CompareError, Result};
use crate::resource::{Args, Env, SecretData, StringMap};

use super::difference::Difference;
use super::inspect::{Inspect, Shape, REDACTED};

/// A field compared by a registered policy.
#[derive(Debug, Clone, Copy)]
pub enum Policy<'a> {
    /// Compared key by key; order is irrelevant.
    Keyed(&'a StringMap),
    /// Compared as a map from variable name to value.
    Env(&'a Env),
    /// Compared position by position.
    Lines(&'a Args),
    /// Compared for equality only; contents never disclosed.
    Opaque(&'a SecretData),
}

impl Policy<'_> {
    /// Renders the field as JSON. Opaque fields render as a placeholder.
    #[must_use]
    pub fn render(&self) -> Value {
        match self {
            Self::Keyed(map) => Value::Object(
                map.0
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            Self::Env(env) => Value::Array(
                env.0
                    .iter()
                    .map(|e| serde_json::json!({ "name": e.name, "value": e.value }))
                    .collect(),
            ),
            Self::Lines(args) => Value::Array(args.0.iter().cloned().map(Value::String).collect()),
            Self::Opaque(_) => Value::String(String::from(REDACTED)),
        }
    }
}

/// Compares two policy fields found at `path`.
///
/// # Errors
///
/// Returns [`CompareError::ShapeMismatch`] if the two fields are governed by
/// different policies.
pub fn apply(a: Policy<'_>, b: Policy<'_>, path: &str, out: &mut Vec<Difference>) -> Result<()> {
    match (a, b) {
        (Policy::Keyed(a), Policy::Keyed(b)) => {
            diff_keyed(&borrow_map(a), &borrow_map(b), path, out);
        }
        (Policy::Env(a), Policy::Env(b)) => diff_keyed(&a.by_name(), &b.by_name(), path, out),
        (Policy::Lines(a), Policy::Lines(b)) => diff_lines(&a.0, &b.0, path, out),
        (Policy::Opaque(a), Policy::Opaque(b)) => {
            if a != b {
                out.push(Difference::opaque_changed(path));
            }
        }
        _ => {
            return Err(CompareError::ShapeMismatch {
                path: path.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

fn borrow_map(map: &StringMap) -> BTreeMap<&str, &str> {
    map.0.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Keyed diff: `changed` for keys on both sides with different values,
/// `removed` for keys only in `a`, `added` for keys only in `b`.
fn diff_keyed(a: &BTreeMap<&str, &str>, b: &BTreeMap<&str, &str>, path: &str, out: &mut Vec<Difference>) {
    for (key, value_a) in a {
        let key_path = format!("{path}[{key}]");
        match b.get(key) {
            Some(value_b) if value_a != value_b => {
                out.push(Difference::changed(key_path, *value_a, *value_b));
            }
            Some(_) => {}
            None => out.push(Difference::removed(key_path, *value_a)),
        }
    }
    for (key, value_b) in b {
        if !a.contains_key(key) {
            out.push(Difference::added(format!("{path}[{key}]"), *value_b));
        }
    }
}

/// Positional line diff. Not an edit-distance diff: a differing line at an
/// index is reported as a removal followed by an addition at that index, and
/// any tail beyond the shorter side is reported line by line.
fn diff_lines(a: &[String], b: &[String], path: &str, out: &mut Vec<Difference>) {
    let common = a.len().min(b.len());
    for (i, (line_a, line_b)) in a.iter().zip(b).enumerate() {
        if line_a != line_b {
            out.push(Difference::removed(format!("{path}[{i}]"), line_a.as_str()));
            out.push(Difference::added(format!("{path}[{i}]"), line_b.as_str()));
        }
    }
    for (i, line) in a.iter().enumerate().skip(common) {
        out.push(Difference::removed(format!("{path}[{i}]"), line.as_str()));
    }
    for (i, line) in b.iter().enumerate().skip(common) {
        out.push(Difference::added(format!("{path}[{i}]"), line.as_str()));
    }
}

// ============================================================================
// Registrations
// ============================================================================

impl Inspect for StringMap {
    fn shape(&self) -> Shape<'_> {
        Shape::Policy(Policy::Keyed(self))
    }
}

impl Inspect for Env {
    fn shape(&self) -> Shape<'_> {
        Shape::Policy(Policy::Env(self))
    }
}

impl Inspect for Args {
    fn shape(&self) -> Shape<'_> {
        Shape::Policy(Policy::Lines(self))
    }
}

impl Inspect for SecretData {
    fn shape(&self) -> Shape<'_> {
        Shape::Policy(Policy::Opaque(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(a: &[&str], b: &[&str]) -> Vec<Difference> {
        let a: Args = a.iter().copied().collect();
        let b: Args = b.iter().copied().collect();
        let mut out = Vec::new();
        apply(Policy::Lines(&a), Policy::Lines(&b), "lines", &mut out).unwrap();
        out
    }

    #[test]
    fn test_empty_line_diff() {
        assert!(lines(&[], &[]).is_empty());
    }

    #[test]
    fn test_some_vs_none_lines() {
        assert_eq!(lines(&[], &["added"]), vec![Difference::added("lines[0]", "added")]);
        assert_eq!(lines(&["gone"], &[]), vec![Difference::removed("lines[0]", "gone")]);
    }

    #[test]
    fn test_single_line_change() {
        let diffs = lines(&["foo", "bar", "baz"], &["foo", "bar", "boom"]);
        assert_eq!(
            diffs,
            vec![
                Difference::removed("lines[2]", "baz"),
                Difference::added("lines[2]", "boom"),
            ]
        );
    }

    #[test]
    fn test_multiple_line_changes() {
        let diffs = lines(&["one", "two", "three", "four", "five"], &["one", "2", "three", "4", "five"]);
        assert_eq!(
            diffs,
            vec![
                Difference::removed("lines[1]", "two"),
                Difference::added("lines[1]", "2"),
                Difference::removed("lines[3]", "four"),
                Difference::added("lines[3]", "4"),
            ]
        );
    }

    #[test]
    fn test_line_diff_is_not_reorder_tolerant() {
        let diffs = lines(&["a", "b"], &["b", "a"]);
        assert_eq!(diffs.len(), 4);
    }

    #[test]
    fn test_keyed_diff() {
        let a: StringMap = [("app", "foo"), ("tier", "web"), ("old", "x")].into_iter().collect();
        let b: StringMap = [("app", "foo"), ("tier", "backend"), ("new", "y")].into_iter().collect();
        let mut out = Vec::new();
        apply(Policy::Keyed(&a), Policy::Keyed(&b), ".selector", &mut out).unwrap();

        assert_eq!(
            out,
            vec![
                Difference::removed(".selector[old]", "x"),
                Difference::changed(".selector[tier]", "web", "backend"),
                Difference::added(".selector[new]", "y"),
            ]
        );
    }

    #[test]
    fn test_env_reorder_is_noop() {
        let a: Env = [("X", "1"), ("Y", "2")].into_iter().collect();
        let b: Env = [("Y", "2"), ("X", "1")].into_iter().collect();
        let mut out = Vec::new();
        apply(Policy::Env(&a), Policy::Env(&b), ".env", &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_env_duplicate_last_wins() {
        let a: Env = [("X", "1"), ("X", "2")].into_iter().collect();
        let b: Env = [("X", "2")].into_iter().collect();
        let mut out = Vec::new();
        apply(Policy::Env(&a), Policy::Env(&b), ".env", &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_opaque_hides_values() {
        let a = SecretData([(String::from("token"), String::from("c2VjcmV0LWE="))].into());
        let b = SecretData([(String::from("token"), String::from("c2VjcmV0LWI="))].into());
        let mut out = Vec::new();
        apply(Policy::Opaque(&a), Policy::Opaque(&b), ".data", &mut out).unwrap();

        assert_eq!(out, vec![Difference::opaque_changed(".data")]);
        let rendered = format!("{out:?}");
        assert!(!rendered.contains("c2VjcmV0"));
    }

    #[test]
    fn test_mismatched_policies() {
        let args = Args::default();
        let env = Env::default();
        let mut out = Vec::new();
        let result = apply(Policy::Lines(&args), Policy::Env(&env), ".x", &mut out);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_opaque_is_redacted() {
        let data = SecretData([(String::from("k"), String::from("v"))].into());
        assert_eq!(Policy::Opaque(&data).render(), Value::String(String::from(REDACTED)));
    }
}
