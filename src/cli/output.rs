//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::OutputFormat;
use crate::diff::{Difference, ObjectSetDiff, Summarizer};
use crate::error::Result;
use crate::manifest::ManifestHasher;
use crate::resource::{ObjectId, ObjectSet, Resource};

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
    /// Whether text output is coloured.
    color: bool,
}

/// Object row for table display.
#[derive(Tabled)]
struct ObjectRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Fingerprint")]
    fingerprint: String,
    #[tabled(rename = "Source")]
    source: String,
}

/// Machine-readable form of a set comparison.
#[derive(Debug, Serialize)]
pub struct DiffReport<'a> {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Provenance of the left set.
    pub source_a: &'a str,
    /// Provenance of the right set.
    pub source_b: &'a str,
    /// Identities only in the left set.
    pub only_a: Vec<&'a ObjectId>,
    /// Identities only in the right set.
    pub only_b: Vec<&'a ObjectId>,
    /// Identities present in both sets that differ.
    pub different: Vec<DifferentObject<'a>>,
    /// Number of identities in any of the above.
    pub total: usize,
}

/// Differences of one identity.
#[derive(Debug, Serialize)]
pub struct DifferentObject<'a> {
    /// The identity.
    pub id: &'a ObjectId,
    /// Its differences.
    pub differences: &'a [Difference],
}

impl<'a> From<&'a ObjectSetDiff<'a>> for DiffReport<'a> {
    fn from(diff: &'a ObjectSetDiff<'a>) -> Self {
        Self {
            generated_at: Utc::now(),
            source_a: diff.source_a,
            source_b: diff.source_b,
            only_a: diff.only_a.iter().map(|o| o.id()).collect(),
            only_b: diff.only_b.iter().map(|o| o.id()).collect(),
            different: diff
                .different
                .iter()
                .map(|(id, differences)| DifferentObject {
                    id,
                    differences: differences.as_slice(),
                })
                .collect(),
            total: diff.total(),
        }
    }
}

#[derive(Serialize)]
struct ObjectJson<'a> {
    id: &'a ObjectId,
    source: &'a str,
    fingerprint: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    /// Formats a set comparison for display.
    #[must_use]
    pub fn format_diff(&self, diff: &ObjectSetDiff<'_>) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&DiffReport::from(diff)).unwrap_or_default()
            }
            OutputFormat::Text => self.format_diff_text(diff),
        }
    }

    /// Formats a set comparison as text.
    fn format_diff_text(&self, diff: &ObjectSetDiff<'_>) -> String {
        if !diff.has_changes() {
            return format!(
                "{} No differences between {} and {}\n",
                self.paint("✓", Style::Added),
                diff.source_a,
                diff.source_b
            );
        }

        let mut output = String::new();
        for line in Summarizer::render(diff).lines() {
            let style = if line.starts_with("+ ") {
                Style::Added
            } else if line.starts_with("- ") {
                Style::Removed
            } else if line.starts_with("Only in ") || line.ends_with(" is different") {
                Style::Header
            } else if line.ends_with(": data has changed") {
                Style::Changed
            } else {
                Style::Plain
            };
            let _ = writeln!(output, "{}", self.paint(line, style));
        }

        let _ = write!(
            output,
            "\n{} only in {}, {} only in {}, {} different\n",
            diff.only_a.len(),
            diff.source_a,
            diff.only_b.len(),
            diff.source_b,
            diff.different.len()
        );

        output
    }

    /// Formats the objects of a set, with their fingerprints.
    ///
    /// # Errors
    ///
    /// Returns an error if an object cannot be rendered for fingerprinting.
    pub fn format_objects(&self, set: &ObjectSet) -> Result<String> {
        let hasher = ManifestHasher::new();

        match self.format {
            OutputFormat::Json => {
                let objects = set
                    .iter()
                    .map(|o| {
                        hasher.fingerprint(o).map(|fingerprint| ObjectJson {
                            id: o.id(),
                            source: o.source(),
                            fingerprint,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(serde_json::to_string_pretty(&objects).unwrap_or_default())
            }
            OutputFormat::Text => {
                if set.is_empty() {
                    return Ok(format!("No objects found in {}.\n", set.source));
                }

                let rows = set
                    .iter()
                    .map(|o| {
                        let id = o.id();
                        hasher.fingerprint(o).map(|fingerprint| ObjectRow {
                            kind: id.kind.clone(),
                            namespace: id.namespace.clone(),
                            name: id.name.clone(),
                            fingerprint: ManifestHasher::short_hash(&fingerprint).to_string(),
                            source: o.source().to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                let mut output = Table::new(rows).to_string();
                let _ = write!(
                    output,
                    "\n{} object(s), set fingerprint {}\n",
                    set.len(),
                    ManifestHasher::short_hash(&hasher.fingerprint_set(set)?)
                );
                Ok(output)
            }
        }
    }

    /// Applies a text style, unless colour is disabled.
    fn paint(&self, text: &str, style: Style) -> String {
        if !self.color {
            return text.to_string();
        }
        match style {
            Style::Added => text.green().to_string(),
            Style::Removed => text.red().to_string(),
            Style::Changed => text.yellow().to_string(),
            Style::Header => text.bold().to_string(),
            Style::Plain => text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Added,
    Removed,
    Changed,
    Header,
    Plain,
}
