//! Leaf-level comparison of two trees.
//!
//! Trees are compared by full leaf path only. Internal structure, child
//! order and the kind of scalar a leaf carries do not matter: two leaves are
//! equal when they would be written identically by the codec.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tree::{Node, NodeRef, NodeStorage};

/// Result of [`diff`]: the leaves to add or update and the leaves to remove
/// to turn the old tree into the new one.
///
/// Both lists hold childless nodes named by their full path, sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDiff {
    /// Leaves only in the new tree, or present in both with a different value.
    /// Carries the new value.
    pub new_nodes: Vec<Node>,
    /// Leaves only in the old tree. Carries the old value.
    pub removed_nodes: Vec<Node>,
}

impl NodeDiff {
    /// Returns true if the trees have the same leaves.
    pub fn is_empty(&self) -> bool {
        self.new_nodes.is_empty() && self.removed_nodes.is_empty()
    }
}

/// Compares two trees.
///
/// ```
/// # use envtree::{Node, diff};
/// let old = Node::internal("", vec![Node::leaf("X", "1")]);
/// let new = Node::internal("", vec![Node::leaf("X", "1"), Node::leaf("Y", "2")]);
///
/// let changes = diff(&old, &new);
/// assert_eq!(changes.new_nodes, vec![Node::leaf("Y", "2")]);
/// assert!(changes.removed_nodes.is_empty());
/// ```
pub fn diff(old: &Node, new: &Node) -> NodeDiff {
    diff_storages(&NodeStorage::flatten(old), &NodeStorage::flatten(new))
}

/// Compares two indexed trees.
pub fn diff_storages(old: &NodeStorage, new: &NodeStorage) -> NodeDiff {
    let old_leaves = rendered_leaves(old);
    let new_leaves = rendered_leaves(new);

    let mut new_nodes: Vec<Node> = new_leaves
        .iter()
        .filter(|(path, (text, _))| {
            old_leaves
                .get(*path)
                .is_none_or(|(old_text, _)| old_text != text)
        })
        .map(|(_, (_, node))| detached(*node))
        .collect();

    let mut removed_nodes: Vec<Node> = old_leaves
        .iter()
        .filter(|(path, _)| !new_leaves.contains_key(*path))
        .map(|(_, (_, node))| detached(*node))
        .collect();

    new_nodes.sort_by(|a, b| a.name.cmp(&b.name));
    removed_nodes.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(
        new = new_nodes.len(),
        removed = removed_nodes.len(),
        "Compared trees"
    );
    NodeDiff {
        new_nodes,
        removed_nodes,
    }
}

fn rendered_leaves(storage: &NodeStorage) -> HashMap<&str, (String, NodeRef<'_>)> {
    storage
        .leaves()
        .filter_map(|node| {
            node.value()
                .map(|value| (node.name(), (value.to_string(), node)))
        })
        .collect()
}

fn detached(node: NodeRef<'_>) -> Node {
    Node {
        name: node.name().to_string(),
        value: node.value().cloned(),
        children: Vec::new(),
    }
}
