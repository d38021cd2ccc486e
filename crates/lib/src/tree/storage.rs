//! Full-path index over a node tree.
//!
//! [`NodeStorage`] keeps every node in a flat arena and links them twice: as
//! a tree (each node lists its children) and through a map from full path to
//! node. Both views always agree: every indexed path has all of its proper
//! prefixes indexed as well, each linked as the parent of the next.
//!
//! Nodes are created by [`NodeStorage::insert`], have their value overwritten
//! when the same path is inserted again, and are never removed individually.

use std::{collections::HashMap, fmt};

use super::{LEVEL_SEPARATOR, Node, Scalar};

/// Position of a node inside a [`NodeStorage`] arena.
pub type NodeId = usize;

/// The root sentinel always occupies the first arena slot.
const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    value: Option<Scalar>,
    children: Vec<NodeId>,
}

/// Tree of named nodes plus a full-path index over the same nodes.
///
/// The root sentinel is keyed by the empty path `""`. It is created on first
/// insertion and never carries a record of its own.
///
/// # Examples
///
/// ```
/// # use envtree::{Node, NodeStorage};
/// let mut storage = NodeStorage::new();
/// storage.insert(Node::leaf("A_B_C", "1"));
///
/// // Intermediate prefixes are created as internal nodes
/// assert!(storage.contains("A"));
/// assert!(storage.contains("A_B"));
/// assert_eq!(storage.get("A_B").map(|n| n.children().count()), Some(1));
///
/// // Re-inserting a path overwrites its value in place
/// storage.insert(Node::leaf("A_B_C", "2"));
/// assert_eq!(storage.value("A_B_C").map(|v| v.to_string()), Some("2".to_string()));
/// assert_eq!(storage.len(), 3);
/// ```
#[derive(Clone)]
pub struct NodeStorage {
    separator: char,
    entries: Vec<Entry>,
    index: HashMap<String, NodeId>,
}

impl NodeStorage {
    /// Creates an empty storage using the default level separator.
    pub fn new() -> Self {
        Self::with_separator(LEVEL_SEPARATOR)
    }

    /// Creates an empty storage splitting paths on `separator`.
    pub fn with_separator(separator: char) -> Self {
        Self {
            separator,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds a storage from a node tree using the default level separator.
    ///
    /// The root node is placed under the empty path; its descendants are
    /// inserted one by one.
    pub fn flatten(root: &Node) -> Self {
        Self::flatten_with_separator(root, LEVEL_SEPARATOR)
    }

    /// Builds a storage from a node tree, splitting paths on `separator`.
    pub fn flatten_with_separator(root: &Node, separator: char) -> Self {
        let mut storage = Self::with_separator(separator);
        let root_id = storage.ensure_root();
        storage.entries[root_id].value = root.value.clone();

        let mut pending: Vec<(&Node, String)> = root
            .children
            .iter()
            .rev()
            .map(|child| (child, child.name.clone()))
            .collect();
        while let Some((node, name)) = pending.pop() {
            storage.insert_one(&name, node.value.clone());
            for child in node.children.iter().rev() {
                let child_name = if storage.is_within(&child.name, &name) {
                    child.name.clone()
                } else {
                    storage.join(&name, &child.name)
                };
                pending.push((child, child_name));
            }
        }
        storage
    }

    /// Returns the level separator used to split paths.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Inserts a node, creating every missing ancestor on the way.
    ///
    /// - Missing intermediate prefixes become internal nodes appended to the
    ///   previous prefix's children; existing ones are reused.
    /// - If the full path already exists, only its value is overwritten and
    ///   its position among its siblings is kept.
    /// - Children carried by `node` are inserted as well. A child whose name
    ///   is not already below `node.name` is re-prefixed with it first.
    /// - An empty name addresses the root sentinel.
    pub fn insert(&mut self, node: Node) {
        self.ensure_root();

        let mut pending = vec![node];
        while let Some(mut node) = pending.pop() {
            let children = std::mem::take(&mut node.children);
            self.insert_one(&node.name, node.value.take());

            // Reversed so siblings are inserted in their original order
            for mut child in children.into_iter().rev() {
                if !self.is_within(&child.name, &node.name) {
                    child.name = self.join(&node.name, &child.name);
                }
                pending.push(child);
            }
        }
    }

    /// Returns the node stored under `path`.
    pub fn get(&self, path: &str) -> Option<NodeRef<'_>> {
        self.index
            .get(path)
            .map(|&id| NodeRef { storage: self, id })
    }

    /// Returns the value stored under `path`.
    pub fn value(&self, path: &str) -> Option<&Scalar> {
        self.index
            .get(path)
            .and_then(|&id| self.entries[id].value.as_ref())
    }

    /// Returns true if `path` is indexed, either as a leaf or as a prefix.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Returns the root sentinel, if anything was inserted yet.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.get("")
    }

    /// Number of indexed nodes, excluding the root sentinel.
    pub fn len(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// Returns true if nothing besides the root sentinel is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every indexed node, root included, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.entries.len()).map(move |id| NodeRef { storage: self, id })
    }

    /// Iterates over the leaves in insertion order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.iter().filter(|node| node.is_leaf())
    }

    /// Materializes the whole tree, starting from the root sentinel.
    pub fn to_node(&self) -> Node {
        self.root().map(NodeRef::to_node).unwrap_or_default()
    }

    fn insert_one(&mut self, name: &str, value: Option<Scalar>) -> NodeId {
        if name.is_empty() {
            let root = self.ensure_root();
            self.entries[root].value = value;
            return root;
        }

        if let Some(&id) = self.index.get(name) {
            self.entries[id].value = value;
            return id;
        }

        let parent = self.ensure_ancestors(name);
        self.push_entry(name.to_string(), value, parent)
    }

    /// Makes sure every proper prefix of `name` is indexed and returns the
    /// node of the longest one.
    fn ensure_ancestors(&mut self, name: &str) -> NodeId {
        let mut parent = self.ensure_root();

        // An indexed parent already has every prefix of its own indexed
        if let Some(&id) = name
            .rfind(self.separator)
            .and_then(|pos| self.index.get(&name[..pos]))
        {
            return id;
        }

        let positions: Vec<usize> = name
            .match_indices(self.separator)
            .map(|(pos, _)| pos)
            .collect();

        for pos in positions {
            let prefix = &name[..pos];
            parent = match self.index.get(prefix) {
                Some(&id) => id,
                None => self.push_entry(prefix.to_string(), None, parent),
            };
        }
        parent
    }

    fn push_entry(&mut self, name: String, value: Option<Scalar>, parent: NodeId) -> NodeId {
        let id = self.entries.len();
        self.index.insert(name.clone(), id);
        self.entries.push(Entry {
            name,
            value,
            children: Vec::new(),
        });
        self.entries[parent].children.push(id);
        id
    }

    fn ensure_root(&mut self) -> NodeId {
        if self.entries.is_empty() {
            self.entries.push(Entry {
                name: String::new(),
                value: None,
                children: Vec::new(),
            });
            self.index.insert(String::new(), ROOT);
        }
        ROOT
    }

    fn is_within(&self, name: &str, parent: &str) -> bool {
        if parent.is_empty() || name == parent {
            return true;
        }
        name.strip_prefix(parent)
            .is_some_and(|rest| rest.starts_with(self.separator))
    }

    fn join(&self, parent: &str, name: &str) -> String {
        if parent.is_empty() {
            return name.to_string();
        }
        let mut path = String::with_capacity(parent.len() + name.len() + 1);
        path.push_str(parent);
        path.push(self.separator);
        path.push_str(name);
        path
    }
}

impl Default for NodeStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Node> for NodeStorage {
    fn from(mut root: Node) -> Self {
        let mut storage = Self::new();
        let root_id = storage.ensure_root();
        storage.entries[root_id].value = root.value.take();
        for child in std::mem::take(&mut root.children) {
            storage.insert(child);
        }
        storage
    }
}

/// Two storages are equal when they index the same paths with the same
/// values and every node lists its children in the same order.
impl PartialEq for NodeStorage {
    fn eq(&self, other: &Self) -> bool {
        self.separator == other.separator
            && self.index.len() == other.index.len()
            && self.iter().all(|node| {
                other.get(node.name()).is_some_and(|theirs| {
                    theirs.value() == node.value()
                        && node
                            .children()
                            .map(NodeRef::name)
                            .eq(theirs.children().map(NodeRef::name))
                })
            })
    }
}

impl fmt::Debug for NodeStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|node| (node.name(), node.value())))
            .finish()
    }
}

/// Borrowed view of a node inside a [`NodeStorage`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    storage: &'a NodeStorage,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// Arena position of this node.
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Full path of this node.
    pub fn name(self) -> &'a str {
        &self.entry().name
    }

    /// Last segment of the path.
    pub fn segment(self) -> &'a str {
        let name = self.name();
        match name.rfind(self.storage.separator) {
            Some(pos) => &name[pos + self.storage.separator.len_utf8()..],
            None => name,
        }
    }

    /// Value of this node, if any.
    pub fn value(self) -> Option<&'a Scalar> {
        self.entry().value.as_ref()
    }

    /// Returns true if the node has a value and no children.
    pub fn is_leaf(self) -> bool {
        let entry = self.entry();
        entry.value.is_some() && entry.children.is_empty()
    }

    /// Returns true if the node has at least one child.
    pub fn has_children(self) -> bool {
        !self.entry().children.is_empty()
    }

    /// Iterates over the direct children in insertion order.
    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> {
        let storage = self.storage;
        self.entry()
            .children
            .iter()
            .map(move |&id| NodeRef { storage, id })
    }

    /// Iterates over this node and all of its descendants in pre-order.
    pub fn descendants(self) -> Descendants<'a> {
        Descendants {
            storage: self.storage,
            pending: vec![self.id],
        }
    }

    /// The storage this node belongs to.
    pub fn storage(self) -> &'a NodeStorage {
        self.storage
    }

    /// Copies this node and its subtree into an owned [`Node`].
    ///
    /// Nodes are visited in pre-order and assembled bottom-up, so the depth
    /// of the subtree does not grow the call stack.
    pub fn to_node(self) -> Node {
        let order: Vec<NodeRef<'a>> = self.descendants().collect();
        let position: HashMap<NodeId, usize> = order
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id, pos))
            .collect();
        let mut built: Vec<Option<Node>> = (0..order.len()).map(|_| None).collect();

        // Descendants come after their ancestors in pre-order
        for (pos, node) in order.iter().enumerate().rev() {
            let children = node
                .children()
                .filter_map(|child| {
                    position
                        .get(&child.id)
                        .and_then(|&child_pos| built.get_mut(child_pos))
                        .and_then(Option::take)
                })
                .collect();
            built[pos] = Some(Node {
                name: node.name().to_string(),
                value: node.value().cloned(),
                children,
            });
        }

        built.first_mut().and_then(Option::take).unwrap_or_default()
    }

    fn entry(self) -> &'a Entry {
        &self.storage.entries[self.id]
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}

/// Pre-order iterator returned by [`NodeRef::descendants`].
pub struct Descendants<'a> {
    storage: &'a NodeStorage,
    pending: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        let children = &self.storage.entries[id].children;
        self.pending.extend(children.iter().rev());
        Some(NodeRef {
            storage: self.storage,
            id,
        })
    }
}
