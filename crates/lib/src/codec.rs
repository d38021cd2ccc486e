//! Flat text records.
//!
//! The text form is one record per line: `FULLPATH=VALUE` followed by a line
//! feed. Only leaves are written; internal nodes are implied by the paths of
//! their descendants. Nothing is escaped.

use tracing::{debug, trace};

use crate::tree::{LEVEL_SEPARATOR, Node, NodeStorage, Scalar};

/// Writes the leaves of `nodes` (and of all their descendants) as records,
/// in depth-first order.
///
/// A node is written iff it has a value and no children; traversal always
/// continues into children.
///
/// ```
/// # use envtree::{Node, codec};
/// let nodes = vec![
///     Node::leaf("ROOT-INT-VALUE", 3),
///     Node::internal("CHILD", vec![Node::leaf("CHILD_BOOL-VAL", true)]),
/// ];
/// assert_eq!(codec::encode(&nodes), b"ROOT-INT-VALUE=3\nCHILD_BOOL-VAL=true\n");
/// ```
pub fn encode(nodes: &[Node]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut pending: Vec<&Node> = nodes.iter().rev().collect();

    while let Some(node) = pending.pop() {
        if let (Some(value), true) = (&node.value, node.children.is_empty()) {
            write_record(&mut out, &node.name, value);
        }
        pending.extend(node.children.iter().rev());
    }
    out
}

/// Writes every leaf of a storage as a record, in tree order.
pub fn encode_storage(storage: &NodeStorage) -> Vec<u8> {
    let mut out = Vec::new();
    if let Some(root) = storage.root() {
        for node in root.descendants() {
            if let (Some(value), false) = (node.value(), node.has_children()) {
                write_record(&mut out, node.name(), value);
            }
        }
    }
    out
}

/// Reads records into a storage split on the default level separator.
pub fn decode(input: &[u8]) -> NodeStorage {
    decode_with_separator(input, LEVEL_SEPARATOR)
}

/// Reads records into a storage split on `separator`.
///
/// The name runs up to the first `=` of a line, the value from there to the
/// line feed. Lines without `=` and a trailing line without a line feed are
/// dropped. A path seen more than once keeps its last value.
///
/// ```
/// # use envtree::codec;
/// let storage = codec::decode(b"A_B=1\nNOVALUEHERE\nA_B=2\nTAIL=x");
/// assert_eq!(storage.value("A_B").map(|v| v.to_string()), Some("2".to_string()));
/// assert!(!storage.contains("NOVALUEHERE"));
/// assert!(!storage.contains("TAIL"));
/// ```
pub fn decode_with_separator(input: &[u8], separator: char) -> NodeStorage {
    let mut storage = NodeStorage::with_separator(separator);
    let mut records = 0usize;
    let mut dropped = 0usize;

    let mut rest = input;
    while let Some(end) = rest.iter().position(|&b| b == b'\n') {
        let line = &rest[..end];
        rest = &rest[end + 1..];

        match line.iter().position(|&b| b == b'=') {
            Some(eq) => {
                let name = String::from_utf8_lossy(&line[..eq]).into_owned();
                let value = String::from_utf8_lossy(&line[eq + 1..]).into_owned();
                storage.insert(Node::leaf(name, Scalar::Text(value)));
                records += 1;
            }
            None => {
                trace!(line = %String::from_utf8_lossy(line), "Dropping line without '='");
                dropped += 1;
            }
        }
    }

    if !rest.is_empty() {
        trace!(tail = %String::from_utf8_lossy(rest), "Dropping unterminated trailing line");
        dropped += 1;
    }

    debug!(records, dropped, "Decoded text records");
    storage
}

fn write_record(out: &mut Vec<u8>, name: &str, value: &Scalar) {
    out.extend_from_slice(name.as_bytes());
    out.push(b'=');
    out.extend_from_slice(value.to_string().as_bytes());
    out.push(b'\n');
}
