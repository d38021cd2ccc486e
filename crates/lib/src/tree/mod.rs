//! Path-indexed node tree.
//!
//! This module provides the data model shared by every other component:
//!
//! - [`Scalar`] - the value carried by a leaf
//! - [`Node`] - an owned, nested node as produced by the encoder or by
//!   capability implementations
//! - [`NodeStorage`] - a tree of nodes plus a full-path index over the same
//!   nodes, built by incremental insertion
//! - [`NodeRef`] - a borrowed view of one node inside a [`NodeStorage`]
//!
//! A node's `name` is always its *full* path: the segments from the root
//! joined by the level separator (`_` by default). `CHILD_STRING-VAL` is the
//! node `STRING-VAL` below the node `CHILD`.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

pub mod storage;

pub use storage::{NodeId, NodeRef, NodeStorage};

/// Default separator between hierarchy levels of a path.
pub const LEVEL_SEPARATOR: char = '_';

/// Default separator between words inside a single path segment.
pub const WORD_SEPARATOR: char = '-';

/// Default separator used to join the elements of a scalar sequence.
pub const LIST_SEPARATOR: char = ',';

/// Value stored in a leaf node.
///
/// The codec always produces [`Scalar::Text`]; the other variants appear when
/// a tree is built by the encoder from typed values. Two scalars are written
/// identically to text iff their [`Display`](fmt::Display) forms are equal.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Scalar {
    /// UTF-8 text
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point number
    Float(f64),
    /// Instant in time
    Time(DateTime<FixedOffset>),
}

impl Scalar {
    /// Returns true if this is the zero value of its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Text(s) => s.is_empty(),
            Scalar::Bool(b) => !b,
            Scalar::Int(n) => *n == 0,
            Scalar::Uint(n) => *n == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::Time(t) => t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0,
        }
    }

    /// Returns the kind name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Uint(_) => "uint",
            Scalar::Float(_) => "float",
            Scalar::Time(_) => "time",
        }
    }

    /// Returns the text if this is a text scalar
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a bool scalar
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is a signed integer scalar
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the instant if this is a time scalar
    pub fn as_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Scalar::Time(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Uint(n) => write!(f, "{n}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Time(t) => f.write_str(&crate::time::format_time(t)),
        }
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Uint(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<DateTime<FixedOffset>> for Scalar {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Scalar::Time(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::Time(value.fixed_offset())
    }
}

/// An owned node with its full path name.
///
/// A node with children and no value is an internal node (object or array
/// container); a node with a value and no children is a leaf. Encoder output
/// and [`CustomEncoder`](crate::CustomEncoder) results are expressed as
/// `Node` trees and inserted into a [`NodeStorage`] afterwards.
///
/// ```
/// # use envtree::{Node, NodeStorage};
/// let node = Node::internal("CHILD", vec![Node::leaf("CHILD_STRING-VAL", "12")]);
/// let storage = NodeStorage::flatten(&Node::internal("", vec![node]));
/// assert_eq!(storage.value("CHILD_STRING-VAL").and_then(|v| v.as_text()), Some("12"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Full path of this node
    pub name: String,
    /// Scalar value, present on leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    /// Child nodes in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a leaf node.
    pub fn leaf(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Creates an internal node holding the given children.
    pub fn internal(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children,
        }
    }

    /// Returns true if the node carries a value and has no children.
    pub fn is_leaf(&self) -> bool {
        self.value.is_some() && self.children.is_empty()
    }

    /// Counts the leaves of this subtree.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if node.is_leaf() {
                count += 1;
            }
            pending.extend(node.children.iter());
        }
        count
    }
}

// Deep trees are taken apart level by level instead of through nested drops
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
