// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # kubediff
//!
//! Semantic diffing of Kubernetes manifests for GitOps-style delivery.
//!
//! ## Overview
//!
//! kubediff loads declarative manifests, models them as typed objects and
//! computes structurally-aware differences between two versions, such as a
//! directory of manifests in git and a snapshot of what is running:
//!
//! - Environment variables compare by name, so reordering them is not a change
//! - Selectors, labels and config data compare key by key
//! - Command lines compare position by position
//! - Secret data is only ever reported as changed, never shown
//!
//! Everything else is compared structurally, field by field.
//!
//! ## Modules
//!
//! - [`resource`]: Typed model of the supported kinds
//! - [`manifest`]: Parsing, loading and rendering manifests
//! - [`diff`]: Object and set comparison, and text summaries
//! - [`config`]: Settings file and environment overrides
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```
//! use kubediff::diff::{diff_set, Summarizer};
//! use kubediff::manifest::Parser;
//!
//! let before = Parser::new().parse(
//!     "kind: Service\nmetadata: {name: web}\nspec:\n  selector: {app: foo}\n",
//!     "git",
//! )?;
//! let after = Parser::new().parse(
//!     "kind: Service\nmetadata: {name: web}\nspec:\n  selector: {app: foo, tier: backend}\n",
//!     "cluster",
//! )?;
//!
//! let diff = diff_set(&before, &after)?;
//! assert_eq!(
//!     Summarizer::render(&diff),
//!     "Service default/web is different\n+ .spec.selector[tier]: backend\n"
//! );
//! # Ok::<(), kubediff::KubeDiffError>(())
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod manifest;
pub mod resource;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{Settings, SettingsLoader};
pub use diff::{diff_object, diff_set, Difference, ObjectSetDiff, Summarizer};
pub use error::{KubeDiffError, Result};
pub use manifest::{DuplicatePolicy, Loader, ManifestHasher, Parser};
pub use resource::{Object, ObjectId, ObjectSet, Resource};
