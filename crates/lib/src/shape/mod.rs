//! Shape classification for encodable and decodable values.
//!
//! Instead of inspecting values at runtime, every type states how it is laid
//! out by implementing [`Encode`] (returning a [`Shape`]) and/or [`Decode`]
//! (returning a [`Slot`]). The encoder and decoder only ever dispatch on these
//! closed enums.
//!
//! Types may additionally expose the [`CustomEncoder`] / [`CustomDecoder`]
//! capabilities to take over the layout of sequence and map shapes that the
//! generic engine cannot handle on its own.
//!
//! Records (struct-like types) are usually described with the
//! [`record!`](crate::record) macro:
//!
//! ```rust
//! use envtree::record;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Child {
//!     string_val: String,
//!     bool_val: bool,
//! }
//! record!(Child { string_val, bool_val });
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Config {
//!     root_int_value: i64,
//!     child: Child,
//!     secret: String,
//! }
//! record!(Config { root_int_value, child, secret: "-" });
//!
//! let config = Config {
//!     root_int_value: 3,
//!     child: Child { string_val: "12".into(), bool_val: true },
//!     secret: "hidden".into(),
//! };
//! let text = envtree::to_string(&config)?;
//! assert_eq!(text, "ROOT-INT-VALUE=3\nCHILD_STRING-VAL=12\nCHILD_BOOL-VAL=true\n");
//! # Ok::<(), envtree::Error>(())
//! ```

mod field;
mod impls;
mod record;

pub use field::{Field, FieldTag};

use crate::{
    Result,
    dynamic::Dynamic,
    tree::{Node, NodeRef, Scalar},
};

/// A value that can be walked by the encoder.
pub trait Encode {
    /// Describes the layout of this value.
    fn shape(&self) -> Shape<'_>;

    /// Returns true if this value is the zero value of its shape.
    ///
    /// Used by `omitempty` tags.
    fn is_zero(&self) -> bool {
        self.shape().is_zero()
    }

    /// Returns the custom encoding capability, if this type has one.
    fn as_custom_encoder(&self) -> Option<&dyn CustomEncoder> {
        None
    }
}

/// Layout of a value being encoded.
pub enum Shape<'a> {
    /// A single leaf value
    Scalar(Scalar),
    /// Optional indirection; `None` encodes to nothing
    Pointer(Option<&'a dyn Encode>),
    /// Named fields in declaration order
    Record(Vec<(Field, &'a dyn Encode)>),
    /// Ordered elements
    Sequence(Vec<&'a dyn Encode>),
    /// Keyed entries; keys are already rendered as text
    Map(Vec<(String, &'a dyn Encode)>),
    /// A shape with no encoding, named for error messages
    Unsupported(&'static str),
}

impl Shape<'_> {
    /// Short name of this shape kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Scalar(_) => "scalar",
            Shape::Pointer(_) => "pointer",
            Shape::Record(_) => "record",
            Shape::Sequence(_) => "sequence",
            Shape::Map(_) => "map",
            Shape::Unsupported(name) => *name,
        }
    }

    /// Returns true if this is the zero value of its shape.
    ///
    /// A record is zero when all its fields are.
    pub fn is_zero(&self) -> bool {
        match self {
            Shape::Scalar(value) => value.is_zero(),
            Shape::Pointer(pointee) => pointee.is_none(),
            Shape::Record(fields) => fields.iter().all(|(_, value)| value.is_zero()),
            Shape::Sequence(items) => items.is_empty(),
            Shape::Map(entries) => entries.is_empty(),
            Shape::Unsupported(_) => false,
        }
    }
}

/// A value that can be populated by the decoder.
pub trait Decode {
    /// Describes where decoded data goes.
    fn slot(&mut self) -> Slot<'_>;

    /// Returns the custom decoding capability, if this type has one.
    fn as_custom_decoder(&mut self) -> Option<&mut dyn CustomDecoder> {
        None
    }
}

/// Destination layout of a value being decoded.
pub enum Slot<'a> {
    /// A single leaf value
    Scalar(&'a mut dyn ScalarSlot),
    /// Optional indirection, allocated on first write
    Pointer(&'a mut dyn PointerSlot),
    /// Named fields in declaration order
    Record(Vec<(Field, &'a mut dyn Decode)>),
    /// Ordered elements
    Sequence(&'a mut dyn SequenceSlot),
    /// Typed map; can only be decoded through a [`CustomDecoder`]
    Map(&'static str),
    /// Dynamically typed tree
    Dynamic(&'a mut Dynamic),
    /// A shape with no decoding, named for error messages
    Unsupported(&'static str),
}

impl Slot<'_> {
    /// Short name of this slot kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::Scalar(_) => "scalar",
            Slot::Pointer(_) => "pointer",
            Slot::Record(_) => "record",
            Slot::Sequence(_) => "sequence",
            Slot::Map(name) => *name,
            Slot::Dynamic(_) => "dynamic",
            Slot::Unsupported(name) => *name,
        }
    }
}

/// Leaf destination. Assignment never fails: text that does not parse
/// leaves the zero value.
pub trait ScalarSlot {
    /// Stores `value`, converting it to the destination type.
    fn assign(&mut self, value: &Scalar);
}

/// Optional destination.
pub trait PointerSlot {
    /// The current pointee, if allocated.
    fn pointee(&mut self) -> Option<&mut dyn Decode>;

    /// Returns the pointee, allocating a default one first if needed.
    fn allocate(&mut self) -> &mut dyn Decode;

    /// A detached default pointee, used to discover paths below an
    /// unallocated pointer without allocating it.
    fn scratch(&self) -> Box<dyn Decode>;
}

/// Growable sequence destination.
pub trait SequenceSlot {
    /// Returns true if elements decode from a single leaf.
    fn element_is_scalar(&self) -> bool;

    /// Removes every element.
    fn clear(&mut self);

    /// Appends a default element and returns it.
    fn push_default(&mut self) -> &mut dyn Decode;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns true if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Capability: produce the nodes for a value at `prefix` directly.
///
/// Consulted for sequence and map containers, and for each element of a
/// sequence. Element encoders are called with the prefix of the sequence.
///
/// Returned nodes should carry full path names; a name that is not already
/// below `prefix` gets `prefix` prepended.
pub trait CustomEncoder {
    /// Encodes `self` below `prefix`.
    fn encode(&self, prefix: &str) -> Result<Vec<Node>>;
}

/// Capability: populate a value from the source subtree at its path.
///
/// Consulted for sequence and map containers. The node passed in is the
/// source node at the container's path, with all of its descendants.
pub trait CustomDecoder {
    /// Decodes `node` into `self`.
    fn decode(&mut self, node: NodeRef<'_>) -> Result<()>;
}
