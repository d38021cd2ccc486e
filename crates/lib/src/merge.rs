//! One-directional overlay of trees.
//!
//! Uniting a source into a target inserts every indexed source path into the
//! target. On a collision the source value wins; paths only present in the
//! target keep their values. The operation is not commutative.

use tracing::debug;

use crate::tree::{Node, NodeStorage};

/// Overlays `src` onto `trg` in place.
///
/// ```
/// # use envtree::{Node, NodeStorage, unite_storages};
/// let src = NodeStorage::flatten(&Node::internal("", vec![Node::leaf("A", "new")]));
/// let mut trg = NodeStorage::flatten(&Node::internal(
///     "",
///     vec![Node::leaf("A", "old"), Node::leaf("B", "kept")],
/// ));
///
/// unite_storages(&src, &mut trg);
/// assert_eq!(trg.value("A").map(|v| v.to_string()), Some("new".to_string()));
/// assert_eq!(trg.value("B").map(|v| v.to_string()), Some("kept".to_string()));
/// ```
pub fn unite_storages(src: &NodeStorage, trg: &mut NodeStorage) {
    let mut inserted = 0usize;
    // The root sentinel is never a record of its own
    for node in src.iter().filter(|node| !node.name().is_empty()) {
        trg.insert(Node {
            name: node.name().to_string(),
            value: node.value().cloned(),
            children: Vec::new(),
        });
        inserted += 1;
    }
    debug!(inserted, total = trg.len(), "United trees");
}

/// Overlays the tree `src` onto the tree `trg`.
///
/// `trg` is rebuilt from the united index. Its root keeps its name.
pub fn unite(src: &Node, trg: &mut Node) {
    let separator = crate::tree::LEVEL_SEPARATOR;
    let source = NodeStorage::flatten_with_separator(src, separator);
    let mut target = NodeStorage::flatten_with_separator(trg, separator);
    unite_storages(&source, &mut target);

    let name = std::mem::take(&mut trg.name);
    *trg = target.to_node();
    trg.name = name;
}
