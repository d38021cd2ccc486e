//! NodeStorage integration tests
//!
//! Insertion invariants: intermediate prefixes, idempotent re-insertion and
//! re-prefixing of pre-built children.

use crate::helpers::*;
use envtree::{Node, NodeStorage, Scalar};

#[test]
fn test_every_prefix_is_indexed() {
    let mut storage = NodeStorage::new();
    storage.insert(Node::leaf("A_B_C_D", "1"));
    storage.insert(Node::leaf("A_B_X", "2"));

    for path in ["A", "A_B", "A_B_C", "A_B_C_D", "A_B_X"] {
        assert!(storage.contains(path), "missing {path}");
    }
    assert_eq!(storage.len(), 5);

    let children: Vec<&str> = storage
        .get("A_B")
        .expect("Failed to get A_B")
        .children()
        .map(|child| child.name())
        .collect();
    assert_eq!(children, vec!["A_B_C", "A_B_X"]);
}

#[test]
fn test_insertion_is_idempotent() {
    let mut once = NodeStorage::new();
    once.insert(Node::leaf("A_B", "1"));

    let mut twice = NodeStorage::new();
    twice.insert(Node::leaf("A_B", "1"));
    twice.insert(Node::leaf("A_B", "1"));

    assert_eq!(once, twice);
}

#[test]
fn test_reinsertion_keeps_sibling_position() {
    let mut storage = storage(&[("A", "1"), ("B", "2"), ("C", "3")]);
    storage.insert(Node::leaf("A", "10"));

    assert_eq!(
        records(&storage),
        pairs(&[("A", "10"), ("B", "2"), ("C", "3")])
    );
}

#[test]
fn test_prebuilt_children_are_prefixed() {
    let mut storage = NodeStorage::new();
    storage.insert(Node::internal(
        "DB",
        vec![
            Node::leaf("HOST", "localhost"),
            Node::leaf("DB_PORT", "5432"),
            Node::leaf("DBX", "other"),
        ],
    ));

    assert_eq!(text_at(&storage, "DB_HOST").as_deref(), Some("localhost"));
    assert_eq!(text_at(&storage, "DB_PORT").as_deref(), Some("5432"));
    // Shares a string prefix but not a segment boundary
    assert_eq!(text_at(&storage, "DB_DBX").as_deref(), Some("other"));
    assert!(!storage.contains("DBX"));
}

#[test]
fn test_typed_values_survive_flattening() {
    let root = Node::internal(
        "",
        vec![Node {
            name: "N".to_string(),
            value: Some(Scalar::Int(7)),
            children: Vec::new(),
        }],
    );
    let storage = NodeStorage::flatten(&root);

    assert_eq!(storage.value("N"), Some(&Scalar::Int(7)));
    assert_eq!(storage.to_node(), root);
}

#[test]
fn test_descendants_in_pre_order() {
    let storage = storage(&[("A_X", "1"), ("B", "2"), ("A_Y_Z", "3")]);
    let root = storage.root().expect("Failed to get root");

    let order: Vec<&str> = root.descendants().map(|node| node.name()).collect();
    assert_eq!(order, vec!["", "A", "A_X", "A_Y", "A_Y_Z", "B"]);
}
