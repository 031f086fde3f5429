//! Node kind classification.

use super::tree::{NodeId, SchemaNode, SchemaTree};
use super::types::NodeKind;

/// Structural kind of a node.
pub fn kind(node: &SchemaNode) -> NodeKind {
    match node {
        SchemaNode::Object { .. } => NodeKind::Object,
        SchemaNode::Array { .. } => NodeKind::Array,
        SchemaNode::Leaf { primitive, .. } => NodeKind::Leaf(*primitive),
        SchemaNode::Unknown { .. } => NodeKind::Unknown,
    }
}

/// Kind of the node behind `id`; ids foreign to `tree` are `Unknown`.
pub fn kind_of(tree: &SchemaTree, id: NodeId) -> NodeKind {
    tree.get(id).map(kind).unwrap_or(NodeKind::Unknown)
}

/// Whether the node may be absent.
pub fn is_optional(node: &SchemaNode) -> bool {
    node.is_optional()
}

/// Two nodes are similar when they share a kind, and for leaves the same
/// primitive tag. Object contents are not compared here.
///
/// `Unknown` is never similar to anything, itself included.
pub fn similar(a: &SchemaNode, b: &SchemaNode) -> bool {
    match (kind(a), kind(b)) {
        (NodeKind::Unknown, _) | (_, NodeKind::Unknown) => false,
        (left, right) => left == right,
    }
}

/// Short type description used in change values: `string`, `array<number>`,
/// `object?`.
pub fn describe(tree: &SchemaTree, node: &SchemaNode) -> String {
    let base = match node {
        SchemaNode::Array { element, .. } => format!("array<{}>", kind_of(tree, *element)),
        other => kind(other).to_string(),
    };
    if node.is_optional() {
        format!("{}?", base)
    } else {
        base
    }
}
