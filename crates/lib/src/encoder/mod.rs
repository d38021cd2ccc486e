//! Typed values to node trees.
//!
//! The [`Encoder`] walks a value through its [`Shape`] and produces a [`Node`]
//! tree whose leaves are the records to write:
//!
//! - a `None` pointer produces nothing; `Some` is followed transparently
//! - a scalar produces a leaf named by the current path
//! - a record produces an internal node with one child per visible field
//! - a map produces an internal node with one child per entry, ordered by
//!   key segment
//! - a sequence of scalars produces a single leaf holding the joined
//!   elements; other sequences produce one child per element, either through
//!   the elements' [`CustomEncoder`] or positionally under `[i]` segments
//!
//! Traversal uses an explicit work stack bounded by
//! [`Options::max_depth`](crate::Options), so deeply nested values fail with
//! [`EncodeError::DepthExceeded`] instead of overflowing the call stack.

mod errors;

pub use errors::EncodeError;

use tracing::{debug, trace};

use crate::{
    naming,
    options::Options,
    shape::{CustomEncoder, Encode, Shape},
    tree::{Node, Scalar},
};

/// Encodes values according to a set of [`Options`].
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'o> {
    options: &'o Options,
}

/// A value waiting to be visited.
struct Frame<'v> {
    value: &'v dyn Encode,
    path: String,
    depth: usize,
    parent: Option<usize>,
}

enum Child {
    /// Index of a node still being built
    Pending(usize),
    /// A node returned by a custom encoder
    Ready(Node),
}

/// A node whose children are still being visited.
struct Pending {
    name: String,
    value: Option<Scalar>,
    children: Vec<Child>,
}

impl Pending {
    fn leaf(name: String, value: Scalar) -> Self {
        Self {
            name,
            value: Some(value),
            children: Vec::new(),
        }
    }

    fn internal(name: String) -> Self {
        Self {
            name,
            value: None,
            children: Vec::new(),
        }
    }

    fn adopted(name: String, nodes: Vec<Node>) -> Self {
        Self {
            name,
            value: None,
            children: nodes.into_iter().map(Child::Ready).collect(),
        }
    }
}

impl<'o> Encoder<'o> {
    /// Creates an encoder using `options`.
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// Encodes `value` below `prefix`.
    ///
    /// Returns `None` when the value produces nothing at all (a `None`
    /// pointer or an empty sequence at the top level).
    ///
    /// ```
    /// # use envtree::{Encoder, Options};
    /// let options = Options::default();
    /// let node = Encoder::new(&options).encode("app", &vec!["a", "b"])?;
    /// let node = node.expect("non-empty sequence");
    /// assert_eq!(node.name, "APP");
    /// assert_eq!(node.value.as_ref().map(|v| v.to_string()), Some("a,b".to_string()));
    /// # Ok::<(), envtree::EncodeError>(())
    /// ```
    pub fn encode(&self, prefix: &str, value: &dyn Encode) -> Result<Option<Node>, EncodeError> {
        let prefix = self.normalize(prefix);
        let mut arena: Vec<Pending> = Vec::new();
        let mut root = None;
        let mut stack = vec![Frame {
            value,
            path: prefix.clone(),
            depth: 0,
            parent: None,
        }];

        while let Some(frame) = stack.pop() {
            if frame.depth > self.options.max_depth {
                return Err(EncodeError::DepthExceeded {
                    path: frame.path,
                    limit: self.options.max_depth,
                });
            }

            let parent = frame.parent;
            let id = arena.len();
            if let Some(pending) = self.visit(frame, id, &mut stack)? {
                arena.push(pending);
                match parent.and_then(|p| arena.get_mut(p)) {
                    Some(parent) => parent.children.push(Child::Pending(id)),
                    None => root = Some(id),
                }
            }
        }

        let node = root.and_then(|root| assemble(arena, root));
        debug!(
            prefix = %prefix,
            leaves = node.as_ref().map_or(0, Node::leaf_count),
            "Encoded value"
        );
        Ok(node)
    }

    /// Visits one frame. Child frames are pushed with `id` as their parent,
    /// which is the arena slot the returned node will occupy.
    fn visit<'v>(
        &self,
        frame: Frame<'v>,
        id: usize,
        stack: &mut Vec<Frame<'v>>,
    ) -> Result<Option<Pending>, EncodeError> {
        let Frame {
            value,
            path,
            depth,
            parent,
        } = frame;

        match value.shape() {
            Shape::Scalar(scalar) => Ok(Some(Pending::leaf(path, scalar))),

            Shape::Pointer(None) => Ok(None),

            Shape::Pointer(Some(pointee)) => {
                stack.push(Frame {
                    value: pointee,
                    path,
                    depth: depth + 1,
                    parent,
                });
                Ok(None)
            }

            Shape::Record(fields) => {
                for (field, field_value) in fields.into_iter().rev() {
                    let tag = field.parsed_tag();
                    if tag.skip {
                        trace!(path = %path, field = field.ident, "Skipping excluded field");
                        continue;
                    }
                    if tag.omit_empty && field_value.is_zero() {
                        trace!(path = %path, field = field.ident, "Omitting empty field");
                        continue;
                    }

                    let segment = field.segment(self.options);
                    stack.push(Frame {
                        value: field_value,
                        path: self.join(&path, &segment),
                        depth: depth + 1,
                        parent: Some(id),
                    });
                }
                Ok(Some(Pending::internal(path)))
            }

            Shape::Sequence(items) => self.visit_sequence(value, items, path, depth, id, stack),

            Shape::Map(entries) => {
                if let Some(custom) = value.as_custom_encoder() {
                    let nodes = self.call_custom(custom, &path)?;
                    return Ok(Some(Pending::adopted(path, nodes)));
                }

                let mut entries: Vec<(String, &'v dyn Encode)> = entries
                    .into_iter()
                    .map(|(key, entry)| (self.key_segment(&key), entry))
                    .collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));

                for (segment, entry) in entries.into_iter().rev() {
                    stack.push(Frame {
                        value: entry,
                        path: self.join(&path, &segment),
                        depth: depth + 1,
                        parent: Some(id),
                    });
                }
                Ok(Some(Pending::internal(path)))
            }

            Shape::Unsupported(shape) => Err(EncodeError::UnsupportedShape {
                path,
                shape: shape.to_string(),
            }),
        }
    }

    fn visit_sequence<'v>(
        &self,
        value: &'v dyn Encode,
        items: Vec<&'v dyn Encode>,
        path: String,
        depth: usize,
        id: usize,
        stack: &mut Vec<Frame<'v>>,
    ) -> Result<Option<Pending>, EncodeError> {
        if items.is_empty() {
            return Ok(None);
        }

        if let Some(custom) = value.as_custom_encoder() {
            let nodes = self.call_custom(custom, &path)?;
            return Ok(Some(Pending::adopted(path, nodes)));
        }

        let scalars: Option<Vec<Scalar>> = items
            .iter()
            .map(|item| match item.shape() {
                Shape::Scalar(scalar) => Some(scalar),
                _ => None,
            })
            .collect();
        if let Some(scalars) = scalars {
            let separator = self.options.list_separator.to_string();
            let joined = scalars
                .iter()
                .map(Scalar::to_string)
                .collect::<Vec<_>>()
                .join(&separator);
            return Ok(Some(Pending::leaf(path, Scalar::Text(joined))));
        }

        // Elements encode themselves, all at the sequence path
        if items
            .first()
            .is_some_and(|item| item.as_custom_encoder().is_some())
        {
            let mut nodes = Vec::new();
            for (index, item) in items.iter().enumerate() {
                match item.as_custom_encoder() {
                    Some(custom) => nodes.extend(self.call_custom(custom, &path)?),
                    None if matches!(item.shape(), Shape::Pointer(None)) => {}
                    None => {
                        return Err(EncodeError::UnsupportedShape {
                            path: self.join(&path, &naming::index_segment(index)),
                            shape: item.shape().kind().to_string(),
                        });
                    }
                }
            }
            return Ok(Some(Pending::adopted(path, nodes)));
        }

        if self.options.strict_sequences {
            let aggregate = items.iter().enumerate().find_map(|(index, item)| {
                match item.shape() {
                    Shape::Record(_) | Shape::Sequence(_) | Shape::Map(_) => {
                        Some((index, item.shape().kind()))
                    }
                    _ => None,
                }
            });
            if let Some((index, kind)) = aggregate {
                return Err(EncodeError::UnsupportedShape {
                    path: self.join(&path, &naming::index_segment(index)),
                    shape: format!("sequence of {kind}"),
                });
            }
        }

        for (index, item) in items.into_iter().enumerate().rev() {
            stack.push(Frame {
                value: item,
                path: self.join(&path, &naming::index_segment(index)),
                depth: depth + 1,
                parent: Some(id),
            });
        }
        Ok(Some(Pending::internal(path)))
    }

    fn call_custom(&self, custom: &dyn CustomEncoder, path: &str) -> Result<Vec<Node>, EncodeError> {
        let mut nodes = custom.encode(path).map_err(|err| EncodeError::Custom {
            path: path.to_string(),
            source: Box::new(err),
        })?;
        for node in &mut nodes {
            adopt(node, path, self.options.level_separator);
        }
        Ok(nodes)
    }

    fn normalize(&self, segment: &str) -> String {
        if self.options.upper_case_names {
            segment.to_uppercase()
        } else {
            segment.to_string()
        }
    }

    fn key_segment(&self, key: &str) -> String {
        let segment = naming::key_segment(
            key,
            self.options.level_separator,
            self.options.word_separator,
        );
        self.normalize(&segment)
    }

    fn join(&self, prefix: &str, segment: &str) -> String {
        naming::join(prefix, segment, self.options.level_separator)
    }
}

/// Prefixes the names of custom encoder output that are not already below
/// their parent.
fn adopt(node: &mut Node, parent: &str, separator: char) {
    let mut pending = vec![(node, parent.to_string())];
    while let Some((node, parent)) = pending.pop() {
        let Node { name, children, .. } = node;
        if !is_below(name, &parent, separator) {
            *name = naming::join(&parent, name, separator);
        }
        for child in children.iter_mut() {
            pending.push((child, name.clone()));
        }
    }
}

fn is_below(name: &str, parent: &str, separator: char) -> bool {
    parent.is_empty()
        || name == parent
        || name
            .strip_prefix(parent)
            .is_some_and(|rest| rest.starts_with(separator))
}

/// Builds the final tree. Every child was created after its parent, so
/// walking the arena backwards always finds children already built.
fn assemble(arena: Vec<Pending>, root: usize) -> Option<Node> {
    let mut built: Vec<Option<Node>> = (0..arena.len()).map(|_| None).collect();

    for (id, pending) in arena.into_iter().enumerate().rev() {
        let children = pending
            .children
            .into_iter()
            .filter_map(|child| match child {
                Child::Pending(child_id) => built.get_mut(child_id).and_then(Option::take),
                Child::Ready(node) => Some(node),
            })
            .collect();

        if let Some(slot) = built.get_mut(id) {
            *slot = Some(Node {
                name: pending.name,
                value: pending.value,
                children,
            });
        }
    }

    built.get_mut(root).and_then(Option::take)
}
