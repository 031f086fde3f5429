//! schemadiff core - schema diffing and migration strategy synthesis.
//!
//! This crate compares two versions of a schema, classifies every difference
//! by compatibility impact, infers likely field renames and proposes phased
//! migration strategies.

pub mod config;
pub mod migration;
pub mod schema;

pub use config::DiffOptions;
pub use migration::{
    diff, Change, ChangeType, Compatibility, DiffError, DiffResult, DiffSummary, ImpactLevel,
    MigrationStep, MigrationStrategy, Risk,
};
pub use schema::{FieldDef, NodeId, NodeKind, PrimitiveType, SchemaDef, SchemaNode, SchemaTree};
