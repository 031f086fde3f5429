//! Schema diffing and migration planning.
//!
//! This module compares two schema trees and turns the differences into a
//! migration assessment:
//! - Recursive field-by-field change detection
//! - Rename inference by name similarity
//! - Impact classification (BREAKING/MAJOR/MINOR/PATCH)
//! - Phased migration strategies with rollback guidance
//!
//! # Strategies
//!
//! | Verdict | Trigger | Strategies | Timeline |
//! |---------|---------|------------|----------|
//! | **compatible** | Only MINOR changes | Direct | 1-3 days |
//! | **risky** | MAJOR, no BREAKING | Gradual, Blue-Green | 1-4 weeks |
//! | **breaking** | Any BREAKING | Gradual, Blue-Green, Version-Based | 2-8 weeks |
//!
//! # Example
//!
//! ```
//! use schemadiff_core::migration::{diff, Compatibility};
//! use schemadiff_core::{DiffOptions, SchemaDef};
//!
//! let old = SchemaDef::object()
//!     .with_field("id", SchemaDef::string())
//!     .with_field("email", SchemaDef::string())
//!     .to_tree();
//! let new = SchemaDef::object()
//!     .with_field("id", SchemaDef::string())
//!     .to_tree();
//!
//! let result = diff(&old, &new, &DiffOptions::new().with_strategies(true))?;
//! assert_eq!(result.compatibility, Compatibility::Breaking);
//! assert_eq!(result.migration_strategies.len(), 3);
//! # Ok::<(), schemadiff_core::DiffError>(())
//! ```

pub mod change;
pub mod detect;
pub mod engine;
pub mod error;
pub mod impact;
pub mod rename;
pub mod strategy;
pub mod validate;

// Re-export main types

// Change types
pub use change::{Change, ChangeKind, ChangeType};

// Detection
pub use detect::ChangeDetector;
pub use rename::{detect_renames, levenshtein, similarity, RENAME_THRESHOLD};
pub use validate::validate;

// Error types
pub use error::{DiffError, TreeSide};

// Impact types
pub use impact::{ImpactClassifier, ImpactLevel};

// Strategy types
pub use strategy::{
    Compatibility, DiffSummary, MigrationStep, MigrationStrategy, Risk, StrategySynthesizer,
    Synthesis,
};

// Entry point
pub use engine::{diff, DiffResult};
