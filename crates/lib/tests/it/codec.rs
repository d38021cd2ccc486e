//! Text codec integration tests

use crate::helpers::*;
use envtree::{Node, codec};

#[test]
fn test_lines_without_separator_are_dropped() {
    let storage = codec::decode(b"NOVALUEHERE\n");
    assert!(storage.is_empty());
    assert!(records(&storage).is_empty());
}

#[test]
fn test_value_runs_from_first_equals_sign() {
    let storage = codec::decode(b"URL=postgres://h/db?sslmode=require\nEMPTY=\n");
    assert_eq!(
        records(&storage),
        pairs(&[("URL", "postgres://h/db?sslmode=require"), ("EMPTY", "")])
    );
}

#[test]
fn test_unterminated_last_line_is_dropped() {
    let storage = codec::decode(b"A=1\nB=2");
    assert_eq!(records(&storage), pairs(&[("A", "1")]));
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let storage = codec::decode(b"A=\xff\n");
    assert_eq!(text_at(&storage, "A").as_deref(), Some("\u{fffd}"));
}

#[test]
fn test_later_records_overwrite_earlier_ones() {
    let storage = codec::decode(b"A_B=1\nA_C=2\nA_B=3\n");
    assert_eq!(records(&storage), pairs(&[("A_B", "3"), ("A_C", "2")]));
}

#[test]
fn test_storage_text_round_trip() {
    let input = b"DB_HOST=localhost\nDB_PORT=5432\nDEBUG=true\n";
    let storage = codec::decode(input);
    assert_eq!(codec::encode_storage(&storage), input.to_vec());
}

#[test]
fn test_encode_nested_nodes() {
    let node = Node::internal(
        "APP",
        vec![
            Node::leaf("APP_NAME", "demo"),
            Node::internal("APP_DB", vec![Node::leaf("APP_DB_PORT", "5432")]),
        ],
    );
    assert_eq!(
        codec::encode(&[node]),
        b"APP_NAME=demo\nAPP_DB_PORT=5432\n".to_vec()
    );
}

#[test]
fn test_custom_separator() {
    let storage = codec::decode_with_separator(b"a.b=1\na.c=2\n", '.');
    assert_eq!(storage.separator(), '.');
    assert_eq!(
        storage
            .get("a")
            .expect("Failed to get a")
            .children()
            .count(),
        2
    );
}
