//! Schema tree representation.
//!
//! The diff engine works on a neutral tree of object, array and leaf nodes.
//! Adapters for concrete validation libraries convert into [`SchemaTree`],
//! either directly through its arena API or through the serde-friendly
//! [`SchemaDef`].

pub mod classify;
pub mod def;
pub mod tree;
pub mod types;

pub use def::{FieldDef, SchemaDef};
pub use tree::{NodeId, SchemaNode, SchemaTree};
pub use types::{NodeKind, PrimitiveType};
