//! Whole-tree input validation.
//!
//! The detector only descends into fields present on both sides, so a
//! one-sided subtree would otherwise be reported without ever being looked
//! at. Every node reachable from the root is checked here before any
//! comparison starts.

use super::change::display_path;
use super::error::{DiffError, TreeSide};
use crate::schema::{NodeId, SchemaNode, SchemaTree};
use std::collections::HashSet;

/// Check that every node reachable from the root is well-formed.
///
/// Rejects cycles, nodes of unknown kind, ids foreign to the tree, duplicate
/// field names within one object, and field names containing `.` or `[`,
/// which could not be told apart from path separators. A tree without a root
/// is valid.
pub fn validate(tree: &SchemaTree, side: TreeSide) -> Result<(), DiffError> {
    match tree.root() {
        Some(root) => TreeValidator::new(tree, side).visit(root, ""),
        None => Ok(()),
    }
}

struct TreeValidator<'a> {
    tree: &'a SchemaTree,
    side: TreeSide,
    /// Nodes on the current descent path.
    ancestors: HashSet<NodeId>,
    /// Nodes whose whole subtree is already known to be valid.
    checked: HashSet<NodeId>,
}

impl<'a> TreeValidator<'a> {
    fn new(tree: &'a SchemaTree, side: TreeSide) -> Self {
        Self {
            tree,
            side,
            ancestors: HashSet::new(),
            checked: HashSet::new(),
        }
    }

    fn visit(&mut self, id: NodeId, path: &str) -> Result<(), DiffError> {
        if self.ancestors.contains(&id) {
            return Err(DiffError::CyclicSchema {
                side: self.side,
                path: path.to_string(),
                node: id,
            });
        }
        // Shared subtrees are checked once.
        if self.checked.contains(&id) {
            return Ok(());
        }

        let node = self.tree.get(id).ok_or_else(|| DiffError::DanglingNode {
            side: self.side,
            path: path.to_string(),
            node: id,
        })?;

        match node {
            SchemaNode::Leaf { .. } => {}
            SchemaNode::Unknown { tag, .. } => {
                return Err(self.malformed(path, format!("unrecognized node kind '{}'", tag)));
            }
            SchemaNode::Array { element, .. } => {
                self.ancestors.insert(id);
                self.visit(*element, &format!("{}[]", path))?;
                self.ancestors.remove(&id);
            }
            SchemaNode::Object { fields, .. } => {
                let mut names = HashSet::with_capacity(fields.len());
                for (name, _) in fields {
                    if name.contains(&['.', '['][..]) {
                        return Err(self.malformed(
                            path,
                            format!("field name '{}' contains a path separator", name),
                        ));
                    }
                    if !names.insert(name.as_str()) {
                        return Err(self.malformed(
                            path,
                            format!(
                                "duplicate field '{}' in object '{}'",
                                name,
                                display_path(path)
                            ),
                        ));
                    }
                }

                self.ancestors.insert(id);
                for (name, child) in fields {
                    self.visit(*child, &format!("{}.{}", path, name))?;
                }
                self.ancestors.remove(&id);
            }
        }

        self.checked.insert(id);
        Ok(())
    }

    fn malformed(&self, path: &str, reason: String) -> DiffError {
        DiffError::MalformedNode {
            side: self.side,
            path: path.to_string(),
            reason,
        }
    }
}
