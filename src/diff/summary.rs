//! Plain-text rendering of set differences.

use std::fmt;
use std::io;

use crate::resource::{Object, Resource};

use super::set::ObjectSetDiff;

/// Renders an [`ObjectSetDiff`] as human-readable text.
///
/// Output order is deterministic: objects and differing identities are listed
/// in identity order, and differences in the order the engine produced them.
/// Opaque values are only ever reported as changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summarizer;

impl Summarizer {
    /// Writes the summary to a formatter-like sink.
    ///
    /// # Errors
    ///
    /// Propagates errors from the sink.
    pub fn write_to(diff: &ObjectSetDiff<'_>, out: &mut impl fmt::Write) -> fmt::Result {
        write_only(out, diff.source_a, &diff.only_a)?;
        write_only(out, diff.source_b, &diff.only_b)?;

        for (id, diffs) in &diff.different {
            writeln!(out, "{} {}/{} is different", id.kind, id.namespace, id.name)?;
            for difference in diffs {
                writeln!(out, "{difference}")?;
            }
        }
        Ok(())
    }

    /// Renders the summary to a string.
    #[must_use]
    pub fn render(diff: &ObjectSetDiff<'_>) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = Self::write_to(diff, &mut out);
        out
    }

    /// Writes the summary to an IO stream.
    ///
    /// # Errors
    ///
    /// Returns any IO error from the stream.
    pub fn write_io(diff: &ObjectSetDiff<'_>, out: &mut impl io::Write) -> io::Result<()> {
        out.write_all(Self::render(diff).as_bytes())
    }
}

fn write_only(out: &mut impl fmt::Write, source: &str, objects: &[&Object]) -> fmt::Result {
    if objects.is_empty() {
        return Ok(());
    }
    writeln!(out, "Only in {source}:")?;
    for obj in objects {
        let id = obj.id();
        writeln!(out, "{} {}/{}", id.kind, id.namespace, id.name)?;
    }
    Ok(())
}
