//! Tree merge integration tests

use envtree::{Node, NodeStorage, unite, unite_storages};

use crate::helpers::*;

#[test]
fn test_source_values_win() {
    let src = storage(&[("A_B", "new"), ("C", "3")]);
    let mut trg = storage(&[("A_B", "old"), ("A_D", "kept")]);

    unite_storages(&src, &mut trg);

    for leaf in src.leaves() {
        assert_eq!(trg.value(leaf.name()), leaf.value());
    }
    assert_eq!(text_at(&trg, "A_D").as_deref(), Some("kept"));
}

#[test]
fn test_empty_target_becomes_copy_of_source() {
    let src = storage(&[("A_B", "1"), ("C", "2")]);
    let mut trg = NodeStorage::new();

    unite_storages(&src, &mut trg);
    assert_eq!(trg, src);
}

#[test]
fn test_unite_nodes() {
    let src = tree(&[("LOG_LEVEL", "debug")]);
    let mut trg = tree(&[("LOG_LEVEL", "info"), ("LOG_FORMAT", "json")]);

    unite(&src, &mut trg);

    let united = NodeStorage::flatten(&trg);
    assert_eq!(
        records(&united),
        pairs(&[("LOG_LEVEL", "debug"), ("LOG_FORMAT", "json")])
    );
}

#[test]
fn test_new_source_paths_appended_after_target_paths() {
    let src = NodeStorage::flatten(&Node::internal(
        "",
        vec![Node::internal("A", vec![Node::leaf("A_B", "1")])],
    ));
    let mut trg = storage(&[("A_C", "2")]);

    unite_storages(&src, &mut trg);
    assert_eq!(records(&trg), pairs(&[("A_C", "2"), ("A_B", "1")]));
}
