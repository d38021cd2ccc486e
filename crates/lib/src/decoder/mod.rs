//! Node trees to typed values.
//!
//! Decoding runs in two phases:
//!
//! 1. **Mapping.** The destination is walked through its [`Slot`]s without
//!    looking at any data, producing a [`PathMapping`] from every full path
//!    the destination can be populated from to the route leading to it.
//! 2. **Application.** The source subtree under the prefix is visited in
//!    pre-order. Each node whose path is in the mapping is handed to its
//!    destination; everything else is ignored.
//!
//! Unknown source paths are never an error. Malformed scalar text decodes to
//! the destination's zero value. Only structural problems with the
//! destination type (a typed map without a [`CustomDecoder`], an unsupported
//! shape, nesting beyond the depth limit) fail.

pub mod coerce;
mod errors;

pub use errors::DecodeError;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    dynamic::Dynamic,
    naming,
    options::{KeyStyle, Options},
    shape::{Decode, SequenceSlot, Slot},
    tree::{NodeRef, NodeStorage, Scalar},
};

/// One step from a destination value towards a nested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Enter the field at this position of a record
    Field(usize),
    /// Enter the pointee of a pointer, allocating it if needed
    Deref,
}

/// What kind of destination a mapped path leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A scalar, set from the node's value
    Scalar,
    /// A sequence, filled from the node's value or its `[i]` children
    Sequence,
    /// A dynamic value, filled from the whole subtree
    Dynamic,
    /// A container with a custom decoder, handed the whole subtree
    Custom,
}

impl Target {
    /// Returns true if this destination consumes the node's descendants.
    pub fn consumes_subtree(self) -> bool {
        !matches!(self, Target::Scalar)
    }
}

#[derive(Debug, Clone)]
struct Route {
    steps: Vec<Step>,
    target: Target,
}

/// Every path a destination can be populated from, with the route to it.
#[derive(Debug, Clone, Default)]
pub struct PathMapping {
    routes: HashMap<String, Route>,
}

impl PathMapping {
    /// Number of mapped paths.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns true if `path` is mapped.
    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    /// Kind of destination at `path`.
    pub fn target(&self, path: &str) -> Option<Target> {
        self.routes.get(path).map(|route| route.target)
    }

    /// Steps from the destination root to `path`.
    pub fn steps(&self, path: &str) -> Option<&[Step]> {
        self.routes.get(path).map(|route| route.steps.as_slice())
    }

    /// All mapped paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    fn insert(&mut self, path: String, steps: &[Step], target: Target) {
        self.routes.insert(
            path,
            Route {
                steps: steps.to_vec(),
                target,
            },
        );
    }
}

/// Decodes node trees according to a set of [`Options`].
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'o> {
    options: &'o Options,
}

impl<'o> Decoder<'o> {
    /// Creates a decoder using `options`.
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// Builds the path mapping of `target` below `prefix`.
    ///
    /// `source` is consulted only to decide whether to look below pointers
    /// that are not allocated yet: their paths are mapped only if the source
    /// has data there. This keeps recursive types finite.
    pub fn mapping(
        &self,
        prefix: &str,
        source: &NodeStorage,
        target: &mut dyn Decode,
    ) -> Result<PathMapping, DecodeError> {
        let prefix = self.normalize(prefix);
        self.build_mapping(&prefix, source, target, 0)
    }

    /// Decodes the source subtree under `prefix` into `target`.
    ///
    /// ```
    /// # use envtree::{Decoder, Options, codec};
    /// let source = codec::decode(b"APP_[0]=x\nAPP_[1]=y\nOTHER=z\n");
    /// let options = Options::default();
    /// let mut target: Vec<String> = Vec::new();
    /// Decoder::new(&options).decode("app", &source, &mut target)?;
    /// assert_eq!(target, vec!["x", "y"]);
    /// # Ok::<(), envtree::DecodeError>(())
    /// ```
    pub fn decode(
        &self,
        prefix: &str,
        source: &NodeStorage,
        target: &mut dyn Decode,
    ) -> Result<(), DecodeError> {
        let prefix = self.normalize(prefix);
        self.decode_at(&prefix, source, target, 0)
    }

    fn decode_at(
        &self,
        prefix: &str,
        source: &NodeStorage,
        target: &mut dyn Decode,
        depth: usize,
    ) -> Result<(), DecodeError> {
        let mapping = self.build_mapping(prefix, source, target, depth)?;

        let Some(start) = source.get(prefix) else {
            debug!(prefix, mapped = mapping.len(), "No source data under prefix");
            return Ok(());
        };

        let mut applied = 0usize;
        let mut ignored = 0usize;
        let mut pending = vec![start];

        while let Some(node) = pending.pop() {
            match mapping.routes.get(node.name()) {
                Some(route) => {
                    self.apply(target, route, node, depth)?;
                    applied += 1;
                    if route.target.consumes_subtree() {
                        continue;
                    }
                }
                None => {
                    if node.is_leaf() {
                        trace!(path = node.name(), "Ignoring unmapped source path");
                        ignored += 1;
                    }
                }
            }
            let first_child = pending.len();
            pending.extend(node.children());
            pending[first_child..].reverse();
        }

        debug!(prefix, mapped = mapping.len(), applied, ignored, "Decoded value");
        Ok(())
    }

    fn build_mapping(
        &self,
        prefix: &str,
        source: &NodeStorage,
        target: &mut dyn Decode,
        depth: usize,
    ) -> Result<PathMapping, DecodeError> {
        let mut mapping = PathMapping::default();
        let mut steps = Vec::new();
        self.collect(target, prefix.to_string(), &mut steps, depth, source, &mut mapping)?;
        Ok(mapping)
    }

    fn collect(
        &self,
        target: &mut dyn Decode,
        path: String,
        steps: &mut Vec<Step>,
        depth: usize,
        source: &NodeStorage,
        mapping: &mut PathMapping,
    ) -> Result<(), DecodeError> {
        if depth > self.options.max_depth {
            return Err(DecodeError::DepthExceeded {
                path,
                limit: self.options.max_depth,
            });
        }

        let container = matches!(target.slot(), Slot::Sequence(_) | Slot::Map(_));
        if container && target.as_custom_decoder().is_some() {
            mapping.insert(path, steps, Target::Custom);
            return Ok(());
        }

        match target.slot() {
            Slot::Scalar(_) => mapping.insert(path, steps, Target::Scalar),

            Slot::Pointer(pointer) => {
                steps.push(Step::Deref);
                let result = match pointer.pointee() {
                    Some(pointee) => self.collect(pointee, path, steps, depth + 1, source, mapping),
                    None if source.contains(&path) => {
                        let mut scratch = pointer.scratch();
                        self.collect(scratch.as_mut(), path, steps, depth + 1, source, mapping)
                    }
                    None => Ok(()),
                };
                steps.pop();
                result?;
            }

            Slot::Record(fields) => {
                for (index, (field, value)) in fields.into_iter().enumerate() {
                    if field.parsed_tag().skip {
                        continue;
                    }
                    let child = naming::join(
                        &path,
                        &field.segment(self.options),
                        self.options.level_separator,
                    );
                    steps.push(Step::Field(index));
                    let result = self.collect(value, child, steps, depth + 1, source, mapping);
                    steps.pop();
                    result?;
                }
            }

            Slot::Sequence(sequence) => {
                if self.options.strict_sequences && !sequence.element_is_scalar() {
                    return Err(DecodeError::CapabilityRequired {
                        path,
                        shape: "sequence".to_string(),
                    });
                }
                mapping.insert(path, steps, Target::Sequence);
            }

            Slot::Map(shape) => {
                return Err(DecodeError::CapabilityRequired {
                    path,
                    shape: shape.to_string(),
                });
            }

            Slot::Dynamic(_) => mapping.insert(path, steps, Target::Dynamic),

            Slot::Unsupported(shape) => {
                return Err(DecodeError::UnsupportedShape {
                    path,
                    shape: shape.to_string(),
                });
            }
        }
        Ok(())
    }

    fn apply(
        &self,
        target: &mut dyn Decode,
        route: &Route,
        node: NodeRef<'_>,
        depth: usize,
    ) -> Result<(), DecodeError> {
        // Scalars without a value leave the destination untouched
        if route.target == Target::Scalar && node.value().is_none() {
            return Ok(());
        }

        let Some(destination) = descend(target, &route.steps) else {
            trace!(path = node.name(), "Route no longer matches destination");
            return Ok(());
        };

        match route.target {
            Target::Scalar => {
                if let (Slot::Scalar(slot), Some(value)) = (destination.slot(), node.value()) {
                    slot.assign(value);
                }
            }
            Target::Sequence => {
                if let Slot::Sequence(sequence) = destination.slot() {
                    self.decode_sequence(sequence, node, depth)?;
                }
            }
            Target::Dynamic => {
                if let Slot::Dynamic(value) = destination.slot() {
                    self.deposit(value, node);
                }
            }
            Target::Custom => {
                if let Some(custom) = destination.as_custom_decoder() {
                    custom.decode(node).map_err(|err| DecodeError::Custom {
                        path: node.name().to_string(),
                        source: Box::new(err),
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Fills a sequence from the joined single-leaf form or from the `[i]`
    /// children of `node`, in the order they first appeared in the source.
    fn decode_sequence(
        &self,
        sequence: &mut dyn SequenceSlot,
        node: NodeRef<'_>,
        depth: usize,
    ) -> Result<(), DecodeError> {
        if let (Some(value), false) = (node.value(), node.has_children()) {
            if sequence.element_is_scalar() {
                sequence.clear();
                let text = coerce::to_text(value);
                if text.is_empty() {
                    return Ok(());
                }
                for piece in text.split(self.options.list_separator) {
                    if let Slot::Scalar(slot) = sequence.push_default().slot() {
                        slot.assign(&Scalar::Text(piece.to_string()));
                    }
                }
            }
            return Ok(());
        }

        let elements: Vec<NodeRef<'_>> = node
            .children()
            .filter(|child| naming::parse_index_segment(child.segment()).is_some())
            .collect();
        if elements.is_empty() {
            return Ok(());
        }

        sequence.clear();
        for element in elements {
            let slot = sequence.push_default();
            self.decode_at(element.name(), node.storage(), slot, depth + 1)?;
        }
        Ok(())
    }

    /// Copies every value in the subtree of `node` into `target`, keyed by
    /// the path segments below `node`.
    fn deposit(&self, target: &mut Dynamic, node: NodeRef<'_>) {
        let separator = node.storage().separator();
        let base = node.name();

        for descendant in node.descendants() {
            let Some(value) = descendant.value() else {
                continue;
            };

            let relative = if descendant.id() == node.id() {
                ""
            } else if base.is_empty() {
                descendant.name()
            } else {
                &descendant.name()[base.len() + separator.len_utf8()..]
            };

            let keys: Vec<String> = if relative.is_empty() {
                Vec::new()
            } else {
                relative
                    .split(separator)
                    .map(|segment| self.key(segment))
                    .collect()
            };

            let value = Dynamic::from_scalar(value, self.options.guess_scalar_types);
            target.insert_path(&keys, value);
        }
    }

    fn key(&self, segment: &str) -> String {
        match self.options.key_style {
            KeyStyle::Verbatim => segment.to_string(),
            KeyStyle::Snake => naming::snake_key(segment, self.options.word_separator),
        }
    }

    fn normalize(&self, prefix: &str) -> String {
        if self.options.upper_case_names {
            prefix.to_uppercase()
        } else {
            prefix.to_string()
        }
    }
}

/// Follows `steps` from `target`, allocating pointers on the way.
fn descend<'t>(target: &'t mut dyn Decode, steps: &[Step]) -> Option<&'t mut dyn Decode> {
    let Some((step, rest)) = steps.split_first() else {
        return Some(target);
    };

    let next = match (step, target.slot()) {
        (Step::Deref, Slot::Pointer(pointer)) => pointer.allocate(),
        (Step::Field(index), Slot::Record(fields)) => {
            fields.into_iter().nth(*index).map(|(_, value)| value)?
        }
        _ => return None,
    };
    descend(next, rest)
}
