//! Arena-backed schema trees.
//!
//! Nodes live in a flat `Vec` and reference each other through [`NodeId`].
//! This keeps the representation cheap to share between fields and lets
//! adapters describe self-referencing schemas, which the diff engine then
//! rejects instead of recursing forever.

use super::types::PrimitiveType;

/// Handle to a node inside a [`SchemaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its tree's arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single node of a schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Record with ordered named fields.
    Object {
        /// Field name and child node, in declaration order.
        fields: Vec<(String, NodeId)>,
        /// Whether the value may be absent.
        optional: bool,
    },
    /// List of a single element type.
    Array {
        /// Element node.
        element: NodeId,
        /// Whether the value may be absent.
        optional: bool,
    },
    /// Primitive value.
    Leaf {
        /// Primitive type tag.
        primitive: PrimitiveType,
        /// Whether the value may be absent.
        optional: bool,
    },
    /// Node an adapter could not map onto object, array or leaf.
    Unknown {
        /// Adapter-provided description of the original node.
        tag: String,
        /// Whether the value may be absent.
        optional: bool,
    },
}

impl SchemaNode {
    /// Whether the value may be absent.
    pub fn is_optional(&self) -> bool {
        match self {
            SchemaNode::Object { optional, .. }
            | SchemaNode::Array { optional, .. }
            | SchemaNode::Leaf { optional, .. }
            | SchemaNode::Unknown { optional, .. } => *optional,
        }
    }

    fn set_optional(&mut self, value: bool) {
        match self {
            SchemaNode::Object { optional, .. }
            | SchemaNode::Array { optional, .. }
            | SchemaNode::Leaf { optional, .. }
            | SchemaNode::Unknown { optional, .. } => *optional = value,
        }
    }
}

/// An in-memory schema: a node arena plus an optional root.
///
/// A tree without a root stands for an absent schema and compares as an
/// object with no fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaTree {
    nodes: Vec<SchemaNode>,
    root: Option<NodeId>,
}

impl SchemaTree {
    /// Create an empty tree with no root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Look up a node. Returns `None` for ids that do not belong to this tree.
    pub fn get(&self, id: NodeId) -> Option<&SchemaNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node and return its id.
    pub fn add(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Insert a required leaf.
    pub fn leaf(&mut self, primitive: PrimitiveType) -> NodeId {
        self.add(SchemaNode::Leaf {
            primitive,
            optional: false,
        })
    }

    /// Insert an optional leaf.
    pub fn optional_leaf(&mut self, primitive: PrimitiveType) -> NodeId {
        self.add(SchemaNode::Leaf {
            primitive,
            optional: true,
        })
    }

    /// Insert a required array of `element`.
    pub fn array(&mut self, element: NodeId) -> NodeId {
        self.add(SchemaNode::Array {
            element,
            optional: false,
        })
    }

    /// Insert a required object with no fields.
    pub fn object(&mut self) -> NodeId {
        self.add(SchemaNode::Object {
            fields: Vec::new(),
            optional: false,
        })
    }

    /// Insert a required object with the given fields.
    pub fn object_with<I, S>(&mut self, fields: I) -> NodeId
    where
        I: IntoIterator<Item = (S, NodeId)>,
        S: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, id)| (name.into(), id))
            .collect();
        self.add(SchemaNode::Object {
            fields,
            optional: false,
        })
    }

    /// Insert a node of unrecognized kind.
    pub fn unknown(&mut self, tag: impl Into<String>) -> NodeId {
        self.add(SchemaNode::Unknown {
            tag: tag.into(),
            optional: false,
        })
    }

    /// Append a field to an object node.
    ///
    /// Returns `false` if `object` is not an object node of this tree.
    pub fn add_field(&mut self, object: NodeId, name: impl Into<String>, child: NodeId) -> bool {
        match self.nodes.get_mut(object.0) {
            Some(SchemaNode::Object { fields, .. }) => {
                fields.push((name.into(), child));
                true
            }
            _ => false,
        }
    }

    /// Change the optional flag of a node.
    ///
    /// Returns `false` if `id` does not belong to this tree.
    pub fn set_optional(&mut self, id: NodeId, optional: bool) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.set_optional(optional);
                true
            }
            None => false,
        }
    }

    /// Child of an object node by field name.
    pub fn field(&self, object: NodeId, name: &str) -> Option<NodeId> {
        match self.get(object)? {
            SchemaNode::Object { fields, .. } => fields
                .iter()
                .find(|(field_name, _)| field_name == name)
                .map(|(_, id)| *id),
            _ => None,
        }
    }

    /// Resolve a change path (`.user.tags[]`) against this tree.
    ///
    /// The empty path is the root. `[]` steps into an array's element. Field
    /// names containing `.` or `[` cannot be addressed; the diff engine
    /// rejects such trees.
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root?;
        let mut rest = path;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("[]") {
                current = match self.get(current)? {
                    SchemaNode::Array { element, .. } => *element,
                    _ => return None,
                };
                rest = after;
            } else if let Some(after) = rest.strip_prefix('.') {
                let end = after.find(&['.', '['][..]).unwrap_or(after.len());
                current = self.field(current, &after[..end])?;
                rest = &after[end..];
            } else {
                return None;
            }
        }

        Some(current)
    }
}
