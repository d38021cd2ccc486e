//! Tree diff integration tests

use envtree::{Mapper, Node, diff, diff_storages};

use crate::helpers::*;

#[test]
fn test_new_leaf_reported() {
    let changes = diff(&tree(&[("X", "1")]), &tree(&[("X", "1"), ("Y", "2")]));
    assert_eq!(changes.new_nodes, vec![Node::leaf("Y", "2")]);
    assert!(changes.removed_nodes.is_empty());
}

#[test]
fn test_diff_with_itself_is_empty() {
    let x = storage(&[("A_B", "1"), ("A_C_D", "2"), ("E", "")]);
    let changes = diff_storages(&x, &x);
    assert!(changes.new_nodes.is_empty());
    assert!(changes.removed_nodes.is_empty());
}

#[test]
fn test_changed_value_reports_new_side() {
    let changes = diff_storages(&storage(&[("A", "1")]), &storage(&[("A", "2")]));
    assert_eq!(changes.new_nodes, vec![Node::leaf("A", "2")]);
    assert!(changes.removed_nodes.is_empty());
}

#[test]
fn test_removed_leaf_reports_old_side() {
    let changes = diff_storages(
        &storage(&[("A_X", "1"), ("A_Y", "2")]),
        &storage(&[("A_X", "1")]),
    );
    assert!(changes.new_nodes.is_empty());
    assert_eq!(changes.removed_nodes, vec![Node::leaf("A_Y", "2")]);
}

#[test]
fn test_results_sorted_by_path() {
    let changes = diff_storages(
        &storage(&[("Z", "1"), ("M", "1")]),
        &storage(&[("C", "1"), ("B", "1"), ("A", "1")]),
    );
    let added: Vec<&str> = changes.new_nodes.iter().map(|n| n.name.as_str()).collect();
    let removed: Vec<&str> = changes
        .removed_nodes
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(added, vec!["A", "B", "C"]);
    assert_eq!(removed, vec!["M", "Z"]);
}

#[test]
fn test_encoded_and_parsed_trees_agree() {
    // Typed leaves and their text form compare equal
    let mapper = Mapper::default();
    let node = mapper
        .encode("", &sample_config())
        .expect("Failed to encode")
        .expect("Encoded nothing");
    let parsed = mapper.parse(SAMPLE_TEXT.as_bytes()).to_node();

    assert!(diff(&node, &parsed).is_empty());
}
