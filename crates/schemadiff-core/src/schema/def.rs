//! Owned schema definitions.
//!
//! `SchemaDef` is the serde-friendly way to describe a schema. It lowers into
//! a [`SchemaTree`] before diffing.

use super::tree::{NodeId, SchemaTree};
use super::types::PrimitiveType;
use serde::{Deserialize, Serialize};

/// A recursive schema definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaDef {
    /// Record with ordered named fields.
    Object {
        /// Fields in declaration order.
        #[serde(default)]
        fields: Vec<FieldDef>,
        /// Whether the value may be absent.
        #[serde(default)]
        optional: bool,
    },
    /// List of a single element type.
    Array {
        /// Element definition.
        items: Box<SchemaDef>,
        /// Whether the value may be absent.
        #[serde(default)]
        optional: bool,
    },
    /// Primitive value.
    Leaf {
        /// Primitive type tag.
        primitive: PrimitiveType,
        /// Whether the value may be absent.
        #[serde(default)]
        optional: bool,
    },
}

/// A named field of an object definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field schema.
    pub schema: SchemaDef,
}

impl FieldDef {
    /// Create a new field.
    pub fn new(name: impl Into<String>, schema: SchemaDef) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

impl SchemaDef {
    /// Create a required object with no fields.
    pub fn object() -> Self {
        SchemaDef::Object {
            fields: Vec::new(),
            optional: false,
        }
    }

    /// Create a required array of `items`.
    pub fn array(items: SchemaDef) -> Self {
        SchemaDef::Array {
            items: Box::new(items),
            optional: false,
        }
    }

    /// Create a required leaf.
    pub fn leaf(primitive: PrimitiveType) -> Self {
        SchemaDef::Leaf {
            primitive,
            optional: false,
        }
    }

    /// Create a required string leaf.
    pub fn string() -> Self {
        Self::leaf(PrimitiveType::String)
    }

    /// Create a required number leaf.
    pub fn number() -> Self {
        Self::leaf(PrimitiveType::Number)
    }

    /// Create a required integer leaf.
    pub fn integer() -> Self {
        Self::leaf(PrimitiveType::Integer)
    }

    /// Create a required boolean leaf.
    pub fn boolean() -> Self {
        Self::leaf(PrimitiveType::Boolean)
    }

    /// Create a required date leaf.
    pub fn date() -> Self {
        Self::leaf(PrimitiveType::Date)
    }

    /// Mark this definition as optional.
    pub fn optional(mut self) -> Self {
        match &mut self {
            SchemaDef::Object { optional, .. }
            | SchemaDef::Array { optional, .. }
            | SchemaDef::Leaf { optional, .. } => *optional = true,
        }
        self
    }

    /// Append a field. Has no effect on non-object definitions.
    pub fn with_field(mut self, name: impl Into<String>, schema: SchemaDef) -> Self {
        if let SchemaDef::Object { fields, .. } = &mut self {
            fields.push(FieldDef::new(name, schema));
        }
        self
    }

    /// Lower this definition into a fresh tree rooted at it.
    pub fn to_tree(&self) -> SchemaTree {
        let mut tree = SchemaTree::new();
        let root = self.lower(&mut tree);
        tree.set_root(root);
        tree
    }

    fn lower(&self, tree: &mut SchemaTree) -> NodeId {
        match self {
            SchemaDef::Object { fields, optional } => {
                let object = tree.object();
                for field in fields {
                    let child = field.schema.lower(tree);
                    tree.add_field(object, field.name.clone(), child);
                }
                tree.set_optional(object, *optional);
                object
            }
            SchemaDef::Array { items, optional } => {
                let element = items.lower(tree);
                let array = tree.array(element);
                tree.set_optional(array, *optional);
                array
            }
            SchemaDef::Leaf {
                primitive,
                optional,
            } => {
                if *optional {
                    tree.optional_leaf(*primitive)
                } else {
                    tree.leaf(*primitive)
                }
            }
        }
    }
}

impl From<&SchemaDef> for SchemaTree {
    fn from(def: &SchemaDef) -> Self {
        def.to_tree()
    }
}
