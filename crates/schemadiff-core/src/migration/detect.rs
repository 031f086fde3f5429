//! Schema tree comparison.
//!
//! Walks two schema trees in lockstep and produces a flat list of changes.
//! Output order at each object level is fixed: additions in new-schema field
//! order, removals in old-schema field order, then the results of recursing
//! into shared fields in old-schema order, then rename promotions.

use super::change::{display_path, Change, ChangeKind};
use super::error::{DiffError, TreeSide};
use super::rename;
use super::validate;
use crate::schema::classify;
use crate::schema::{NodeId, SchemaNode, SchemaTree};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Compare two trees from their roots.
pub fn detect(
    old: &SchemaTree,
    new: &SchemaTree,
    detect_renames: bool,
) -> Result<Vec<Change>, DiffError> {
    ChangeDetector::new(old, new, detect_renames).detect()
}

/// Recursive change detector over a pair of trees.
pub struct ChangeDetector<'a> {
    old: &'a SchemaTree,
    new: &'a SchemaTree,
    detect_renames: bool,
    /// Nodes on the current descent path, per tree.
    old_ancestors: HashSet<NodeId>,
    new_ancestors: HashSet<NodeId>,
}

impl<'a> ChangeDetector<'a> {
    /// Create a detector.
    pub fn new(old: &'a SchemaTree, new: &'a SchemaTree, detect_renames: bool) -> Self {
        Self {
            old,
            new,
            detect_renames,
            old_ancestors: HashSet::new(),
            new_ancestors: HashSet::new(),
        }
    }

    /// Compare the roots. An absent root behaves like an object with no fields.
    ///
    /// Both trees are validated in full first, so malformed one-sided
    /// subtrees are rejected too.
    pub fn detect(&mut self) -> Result<Vec<Change>, DiffError> {
        validate::validate(self.old, TreeSide::Old)?;
        validate::validate(self.new, TreeSide::New)?;

        match (self.old.root(), self.new.root()) {
            (None, None) => Ok(Vec::new()),
            (Some(old), Some(new)) => self.compare(old, new, ""),
            (None, Some(new)) => self.one_sided(TreeSide::New, new),
            (Some(old), None) => self.one_sided(TreeSide::Old, old),
        }
    }

    /// Compare two nodes at `path`.
    pub fn compare(&mut self, old: NodeId, new: NodeId, path: &str) -> Result<Vec<Change>, DiffError> {
        self.enter(TreeSide::Old, old, path)?;
        if let Err(e) = self.enter(TreeSide::New, new, path) {
            self.old_ancestors.remove(&old);
            return Err(e);
        }

        let result = self.compare_nodes(old, new, path);

        self.old_ancestors.remove(&old);
        self.new_ancestors.remove(&new);
        result
    }

    fn compare_nodes(&mut self, old_id: NodeId, new_id: NodeId, path: &str) -> Result<Vec<Change>, DiffError> {
        let old = self.node(TreeSide::Old, old_id, path)?;
        let new = self.node(TreeSide::New, new_id, path)?;

        if !classify::similar(old, new) {
            return Ok(vec![self.type_changed(old, new, path)]);
        }

        let mut changes = Vec::new();

        if old.is_optional() != new.is_optional() {
            changes.push(self.optionality_changed(old, new, path));
        }

        match (old, new) {
            (
                SchemaNode::Object { fields: old_fields, .. },
                SchemaNode::Object { fields: new_fields, .. },
            ) => {
                changes.extend(self.compare_objects(old_fields, new_fields, path)?);
            }
            (
                SchemaNode::Array { element: old_element, .. },
                SchemaNode::Array { element: new_element, .. },
            ) => {
                let element_path = format!("{}[]", path);
                let old_node = self.node(TreeSide::Old, *old_element, &element_path)?;
                let new_node = self.node(TreeSide::New, *new_element, &element_path)?;

                if classify::similar(old_node, new_node) {
                    changes.extend(self.compare(*old_element, *new_element, &element_path)?);
                } else {
                    let from = classify::kind(old_node);
                    let to = classify::kind(new_node);
                    let description = format!(
                        "Changed array element type of '{}' from {} to {}",
                        display_path(path),
                        from,
                        to
                    );
                    let suggestion = format!(
                        "Every stored element of '{}' must be converted; consider a new field instead",
                        display_path(path)
                    );
                    changes.push(
                        Change::new(ChangeKind::ArrayElementChanged { from, to }, element_path, description)
                            .with_values(
                                Some(classify::describe(self.old, old_node)),
                                Some(classify::describe(self.new, new_node)),
                            )
                            .with_suggestion(suggestion),
                    );
                }
            }
            // Similar leaves differ at most in optionality, handled above.
            _ => {}
        }

        Ok(changes)
    }

    fn compare_objects(
        &mut self,
        old_fields: &'a [(String, NodeId)],
        new_fields: &'a [(String, NodeId)],
        path: &str,
    ) -> Result<Vec<Change>, DiffError> {
        let old_names: HashMap<&str, NodeId> = old_fields
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
            .collect();
        let new_names: HashMap<&str, NodeId> = new_fields
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
            .collect();

        let mut added = Vec::new();
        let mut added_nodes = Vec::new();
        for (name, id) in new_fields {
            if old_names.contains_key(name.as_str()) {
                continue;
            }
            let field_path = format!("{}.{}", path, name);
            let node = self.node(TreeSide::New, *id, &field_path)?;
            added.push(self.field_added(name, node, field_path));
            added_nodes.push((name.as_str(), node));
        }

        let mut removed = Vec::new();
        let mut removed_nodes = Vec::new();
        for (name, id) in old_fields {
            if new_names.contains_key(name.as_str()) {
                continue;
            }
            let field_path = format!("{}.{}", path, name);
            let node = self.node(TreeSide::Old, *id, &field_path)?;
            removed.push(self.field_removed(name, node, field_path));
            removed_nodes.push((name.as_str(), node));
        }

        let mut nested = Vec::new();
        for (name, old_id) in old_fields {
            if let Some(new_id) = new_names.get(name.as_str()) {
                let field_path = format!("{}.{}", path, name);
                nested.extend(self.compare(*old_id, *new_id, &field_path)?);
            }
        }

        let mut renames = Vec::new();
        if self.detect_renames && !added_nodes.is_empty() && !removed_nodes.is_empty() {
            renames = rename::detect_renames(&removed_nodes, &added_nodes, path);
            if !renames.is_empty() {
                trace!(
                    path = display_path(path),
                    promoted = renames.len(),
                    "promoted rename candidates"
                );
                let renamed_from: HashSet<&str> = renames.iter().map(|c| c.path.as_str()).collect();
                let renamed_to: HashSet<String> = renames
                    .iter()
                    .filter_map(|c| match &c.kind {
                        ChangeKind::Renamed { new_path, .. } => Some(new_path.clone()),
                        _ => None,
                    })
                    .collect();

                removed.retain(|c| !renamed_from.contains(c.path.as_str()));
                added.retain(|c| !renamed_to.contains(&c.path));
            }
        }

        let mut changes = added;
        changes.append(&mut removed);
        changes.append(&mut nested);
        changes.append(&mut renames);
        Ok(changes)
    }

    /// Report every field of a schema that has no counterpart at all.
    fn one_sided(&self, side: TreeSide, root: NodeId) -> Result<Vec<Change>, DiffError> {
        let node = self.node(side, root, "")?;

        let fields = match node {
            SchemaNode::Object { fields, .. } => fields,
            _ => {
                let change = match side {
                    TreeSide::New => self.field_added("", node, String::new()),
                    TreeSide::Old => self.field_removed("", node, String::new()),
                };
                return Ok(vec![change]);
            }
        };

        let mut changes = Vec::with_capacity(fields.len());
        for (name, id) in fields {
            let field_path = format!(".{}", name);
            let child = self.node(side, *id, &field_path)?;
            changes.push(match side {
                TreeSide::New => self.field_added(name, child, field_path),
                TreeSide::Old => self.field_removed(name, child, field_path),
            });
        }
        Ok(changes)
    }

    fn field_added(&self, name: &str, node: &SchemaNode, path: String) -> Change {
        let optional = node.is_optional();
        let value = classify::describe(self.new, node);
        let description = format!(
            "Added {} field '{}' ({})",
            if optional { "optional" } else { "required" },
            field_label(name, &path),
            value
        );

        let change = Change::new(ChangeKind::Added { optional }, path, description)
            .with_values(None, Some(value));
        if optional {
            change
        } else {
            let suggestion = format!(
                "Existing data has no value for '{}'; provide a default or backfill it, or add it as optional first",
                display_path(&change.path)
            );
            change.with_suggestion(suggestion)
        }
    }

    fn field_removed(&self, name: &str, node: &SchemaNode, path: String) -> Change {
        let value = classify::describe(self.old, node);
        let description = format!("Removed field '{}' ({})", field_label(name, &path), value);
        let suggestion = format!(
            "Deprecate '{}' first and remove it once no consumer reads it",
            display_path(&path)
        );
        Change::new(ChangeKind::Removed, path, description)
            .with_values(Some(value), None)
            .with_suggestion(suggestion)
    }

    fn type_changed(&self, old: &SchemaNode, new: &SchemaNode, path: &str) -> Change {
        let from = classify::kind(old);
        let to = classify::kind(new);
        let from_optional = old.is_optional();
        let to_optional = new.is_optional();

        let mut description = format!(
            "Changed type of '{}' from {} to {}",
            display_path(path),
            from,
            to
        );
        let mut suggestion = format!(
            "Provide a conversion for existing values of '{}' or introduce a new field",
            display_path(path)
        );
        if from_optional != to_optional {
            description.push_str(if to_optional {
                " and made it optional"
            } else {
                " and made it required"
            });
        }
        if from_optional && !to_optional {
            suggestion.push_str("; records that lack it must be backfilled first");
        }

        let kind = ChangeKind::TypeChanged {
            from,
            to,
            from_optional,
            to_optional,
        };
        Change::new(kind, path, description)
            .with_values(
                Some(classify::describe(self.old, old)),
                Some(classify::describe(self.new, new)),
            )
            .with_suggestion(suggestion)
    }

    fn optionality_changed(&self, old: &SchemaNode, new: &SchemaNode, path: &str) -> Change {
        let from_optional = old.is_optional();
        let to_optional = new.is_optional();
        let kind = ChangeKind::OptionalityChanged {
            from_optional,
            to_optional,
        };
        let values = (
            Some(classify::describe(self.old, old)),
            Some(classify::describe(self.new, new)),
        );

        if to_optional {
            Change::new(kind, path, format!("Made '{}' optional", display_path(path)))
                .with_values(values.0, values.1)
        } else {
            Change::new(kind, path, format!("Made '{}' required", display_path(path)))
                .with_values(values.0, values.1)
                .with_suggestion(format!(
                    "Backfill records that lack '{}' before enforcing it",
                    display_path(path)
                ))
        }
    }

    fn tree(&self, side: TreeSide) -> &'a SchemaTree {
        match side {
            TreeSide::Old => self.old,
            TreeSide::New => self.new,
        }
    }

    /// Resolve a node, rejecting dangling ids and unrecognized kinds.
    fn node(&self, side: TreeSide, id: NodeId, path: &str) -> Result<&'a SchemaNode, DiffError> {
        let node = self.tree(side).get(id).ok_or_else(|| DiffError::DanglingNode {
            side,
            path: path.to_string(),
            node: id,
        })?;

        if let SchemaNode::Unknown { tag, .. } = node {
            return Err(DiffError::MalformedNode {
                side,
                path: path.to_string(),
                reason: format!("unrecognized node kind '{}'", tag),
            });
        }

        Ok(node)
    }

    fn enter(&mut self, side: TreeSide, id: NodeId, path: &str) -> Result<(), DiffError> {
        let ancestors = match side {
            TreeSide::Old => &mut self.old_ancestors,
            TreeSide::New => &mut self.new_ancestors,
        };
        if ancestors.insert(id) {
            Ok(())
        } else {
            Err(DiffError::CyclicSchema {
                side,
                path: path.to_string(),
                node: id,
            })
        }
    }
}

fn field_label<'p>(name: &'p str, path: &'p str) -> &'p str {
    if name.is_empty() {
        display_path(path)
    } else {
        name
    }
}
