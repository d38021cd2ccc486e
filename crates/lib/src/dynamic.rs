//! Dynamically typed values.
//!
//! [`Dynamic`] is the destination for data whose layout is not known in
//! advance. The decoder fills it by walking the source subtree and creating
//! nested maps keyed by path segments, without any precomputed mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    decoder::coerce::parse_bool,
    shape::{Decode, Encode, Shape, Slot},
    tree::Scalar,
};

/// A dynamically typed value tree.
///
/// The default value is an empty map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dynamic {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Dynamic>),
    Map(BTreeMap<String, Dynamic>),
}

impl Default for Dynamic {
    fn default() -> Self {
        Dynamic::Map(BTreeMap::new())
    }
}

impl Dynamic {
    /// Converts a leaf value, guessing a type for text when `guess` is set.
    pub fn from_scalar(value: &Scalar, guess: bool) -> Self {
        match value {
            Scalar::Text(text) if guess => guess_scalar(text),
            Scalar::Text(text) => Dynamic::Text(text.clone()),
            Scalar::Bool(b) => Dynamic::Bool(*b),
            Scalar::Int(n) => Dynamic::Int(*n),
            Scalar::Uint(n) => i64::try_from(*n)
                .map(Dynamic::Int)
                .unwrap_or(Dynamic::Float(*n as f64)),
            Scalar::Float(f) => Dynamic::Float(*f),
            Scalar::Time(_) => Dynamic::Text(value.to_string()),
        }
    }

    /// Returns the entry under `key` if this is a map.
    pub fn get(&self, key: &str) -> Option<&Dynamic> {
        match self {
            Dynamic::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Follows a sequence of map keys.
    pub fn get_path<'k>(&self, keys: impl IntoIterator<Item = &'k str>) -> Option<&Dynamic> {
        keys.into_iter().try_fold(self, |current, key| current.get(key))
    }

    /// Returns the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Dynamic::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the map if this is a map value
    pub fn as_map(&self) -> Option<&BTreeMap<String, Dynamic>> {
        match self {
            Dynamic::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns true if this is a map
    pub fn is_map(&self) -> bool {
        matches!(self, Dynamic::Map(_))
    }

    /// Stores `value` under the nested `keys`, turning any non-map value met
    /// on the way into an empty map. An empty key list replaces `self`.
    pub fn insert_path(&mut self, keys: &[String], value: Dynamic) {
        let Some((first, rest)) = keys.split_first() else {
            *self = value;
            return;
        };

        if !self.is_map() {
            *self = Dynamic::default();
        }
        if let Dynamic::Map(map) = self {
            map.entry(first.clone()).or_default().insert_path(rest, value);
        }
    }
}

/// Guesses the type of leaf text.
///
/// In order: a boolean literal becomes a boolean; text containing a decimal
/// point that parses as a float becomes a float; text that parses as an
/// integer becomes an integer; anything else stays text.
///
/// ```
/// # use envtree::{Dynamic, dynamic::guess_scalar};
/// assert_eq!(guess_scalar("true"), Dynamic::Bool(true));
/// assert_eq!(guess_scalar("1.5"), Dynamic::Float(1.5));
/// assert_eq!(guess_scalar("42"), Dynamic::Int(42));
/// assert_eq!(guess_scalar("007"), Dynamic::Int(7));
/// assert_eq!(guess_scalar("v1"), Dynamic::Text("v1".into()));
/// ```
pub fn guess_scalar(text: &str) -> Dynamic {
    if let Some(b) = parse_bool(text).filter(|_| is_bool_word(text)) {
        return Dynamic::Bool(b);
    }
    if text.contains('.') {
        if let Ok(f) = text.parse::<f64>() {
            return Dynamic::Float(f);
        }
    }
    if let Ok(n) = text.parse::<i64>() {
        return Dynamic::Int(n);
    }
    Dynamic::Text(text.to_string())
}

/// `1` and `0` are boolean literals too, but guessing keeps them numeric.
fn is_bool_word(text: &str) -> bool {
    text != "1" && text != "0"
}

impl Encode for Dynamic {
    fn shape(&self) -> Shape<'_> {
        match self {
            Dynamic::Bool(b) => Shape::Scalar(Scalar::Bool(*b)),
            Dynamic::Int(n) => Shape::Scalar(Scalar::Int(*n)),
            Dynamic::Float(f) => Shape::Scalar(Scalar::Float(*f)),
            Dynamic::Text(text) => Shape::Scalar(Scalar::Text(text.clone())),
            Dynamic::List(items) => {
                Shape::Sequence(items.iter().map(|item| item as &dyn Encode).collect())
            }
            Dynamic::Map(map) => Shape::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), value as &dyn Encode))
                    .collect(),
            ),
        }
    }
}

impl Decode for Dynamic {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }
}

impl From<&str> for Dynamic {
    fn from(value: &str) -> Self {
        Dynamic::Text(value.to_string())
    }
}

impl From<String> for Dynamic {
    fn from(value: String) -> Self {
        Dynamic::Text(value)
    }
}

impl From<bool> for Dynamic {
    fn from(value: bool) -> Self {
        Dynamic::Bool(value)
    }
}

impl From<i64> for Dynamic {
    fn from(value: i64) -> Self {
        Dynamic::Int(value)
    }
}

impl From<f64> for Dynamic {
    fn from(value: f64) -> Self {
        Dynamic::Float(value)
    }
}
