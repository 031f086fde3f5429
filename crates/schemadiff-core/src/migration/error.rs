//! Diff-specific error types.

use crate::schema::NodeId;
use thiserror::Error;

/// Which input tree an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeSide {
    /// The schema being migrated from.
    Old,
    /// The schema being migrated to.
    New,
}

impl std::fmt::Display for TreeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeSide::Old => write!(f, "old"),
            TreeSide::New => write!(f, "new"),
        }
    }
}

/// Malformed-input errors. These are the only failures the engine reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// A node is reachable from itself.
    #[error("cyclic schema in {side} tree at '{path}': node {node} is its own ancestor")]
    CyclicSchema {
        /// Tree containing the cycle.
        side: TreeSide,
        /// Path at which the cycle was re-entered.
        path: String,
        /// The node that was visited twice.
        node: NodeId,
    },

    /// A node is neither object, array nor leaf.
    #[error("malformed node in {side} tree at '{path}': {reason}")]
    MalformedNode {
        /// Tree containing the node.
        side: TreeSide,
        /// Path of the node.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A node id does not belong to the tree that references it.
    #[error("dangling node reference {node} in {side} tree at '{path}'")]
    DanglingNode {
        /// Tree holding the reference.
        side: TreeSide,
        /// Path of the reference.
        path: String,
        /// The unresolvable id.
        node: NodeId,
    },
}

impl DiffError {
    /// Path of the offending node.
    pub fn path(&self) -> &str {
        match self {
            DiffError::CyclicSchema { path, .. }
            | DiffError::MalformedNode { path, .. }
            | DiffError::DanglingNode { path, .. } => path,
        }
    }

    /// Tree the offending node belongs to.
    pub fn side(&self) -> TreeSide {
        match self {
            DiffError::CyclicSchema { side, .. }
            | DiffError::MalformedNode { side, .. }
            | DiffError::DanglingNode { side, .. } => *side,
        }
    }
}
