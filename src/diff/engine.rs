//! Structural comparison of two objects.
//!
//! The engine walks the [`Shape`]s of both sides in lockstep, building a path
//! as it descends. A field with a registered policy is handed to that policy
//! and not descended into; everything else is compared by shape.

use tracing::debug;

use crate::error::{CompareError, Result};
use crate::resource::{Object, Resource};

use super::difference::Difference;
use super::inspect::{render, Inspect, Shape};
use super::policy;

/// Computes the differences between two versions of the same object.
///
/// # Errors
///
/// Returns an error if the objects have different identities, are different
/// kinds of object, or contain a value with no defined comparison.
pub fn diff_object(a: &Object, b: &Object) -> Result<Vec<Difference>> {
    if a.id() != b.id() {
        return Err(CompareError::IdentityMismatch {
            a: a.id().clone(),
            b: b.id().clone(),
        }
        .into());
    }

    if a.kind() != b.kind() {
        return Err(CompareError::TypeMismatch {
            id: a.id().clone(),
            a_kind: a.kind().to_string(),
            b_kind: b.kind().to_string(),
        }
        .into());
    }

    let mut out = Vec::new();
    diff_value(a.body(), b.body(), "", &mut out)?;
    debug!("{} has {} difference(s)", a.id(), out.len());
    Ok(out)
}

/// Compares two values found at `path`, appending differences to `out`.
///
/// # Errors
///
/// Returns [`CompareError::NotDiffable`] for unordered maps and open-ended
/// values, and [`CompareError::ShapeMismatch`] if the two sides do not have
/// the same structure.
pub fn diff_value(a: &dyn Inspect, b: &dyn Inspect, path: &str, out: &mut Vec<Difference>) -> Result<()> {
    match (a.shape(), b.shape()) {
        (Shape::Policy(pa), Shape::Policy(pb)) => policy::apply(pa, pb, path, out),
        (shape @ (Shape::Unordered(_) | Shape::Open(_)), _)
        | (_, shape @ (Shape::Unordered(_) | Shape::Open(_))) => {
            Err(CompareError::not_diffable(path, shape.describe()).into())
        }
        (Shape::Record(fa), Shape::Record(fb)) => diff_record(&fa, &fb, path, out),
        (Shape::Reference(ra), Shape::Reference(rb)) => match (ra, rb) {
            (Some(ra), Some(rb)) => diff_value(ra, rb, path, out),
            (None, Some(rb)) => {
                out.push(Difference::added(path, render(rb)));
                Ok(())
            }
            (Some(ra), None) => {
                out.push(Difference::removed(path, render(ra)));
                Ok(())
            }
            (None, None) => Ok(()),
        },
        (Shape::Sequence(sa), Shape::Sequence(sb)) => diff_sequence(&sa, &sb, path, out),
        (Shape::Scalar(x), Shape::Scalar(y)) => {
            if x != y {
                out.push(Difference::changed(path, x, y));
            }
            Ok(())
        }
        _ => Err(CompareError::ShapeMismatch {
            path: path.to_string(),
        }
        .into()),
    }
}

fn diff_record(
    a: &[(&'static str, &dyn Inspect)],
    b: &[(&'static str, &dyn Inspect)],
    path: &str,
    out: &mut Vec<Difference>,
) -> Result<()> {
    if a.len() != b.len() || a.iter().zip(b).any(|((na, _), (nb, _))| na != nb) {
        return Err(CompareError::ShapeMismatch {
            path: path.to_string(),
        }
        .into());
    }

    for ((name, fa), (_, fb)) in a.iter().zip(b) {
        diff_value(*fa, *fb, &format!("{path}.{name}"), out)?;
    }
    Ok(())
}

/// Index by index up to the shorter length, then the tail of whichever side
/// is longer.
fn diff_sequence(a: &[&dyn Inspect], b: &[&dyn Inspect], path: &str, out: &mut Vec<Difference>) -> Result<()> {
    let common = a.len().min(b.len());
    for (i, (ea, eb)) in a.iter().zip(b).enumerate() {
        diff_value(*ea, *eb, &format!("{path}[{i}]"), out)?;
    }
    for (i, ea) in a.iter().enumerate().skip(common) {
        out.push(Difference::removed(format!("{path}[{i}]"), render(*ea)));
    }
    for (i, eb) in b.iter().enumerate().skip(common) {
        out.push(Difference::added(format!("{path}[{i}]"), render(*eb)));
    }
    Ok(())
}
