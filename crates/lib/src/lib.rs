//!
//! Envtree: bidirectional mapping between flat `PATH=VALUE` records and typed values.
//!
//! A record such as `CHILD_STRING-VAL=12` names a leaf by its full path. The
//! level separator (`_`) splits the path into segments, the word separator
//! (`-`) joins words inside one segment, and `[i]` segments address sequence
//! elements.
//!
//! ## Core Concepts
//!
//! * **Trees (`tree::NodeStorage`)**: A path-indexed tree built by incremental, idempotent insertion of full-path nodes.
//! * **Codec (`codec`)**: Line-oriented text to and from a `NodeStorage`.
//! * **Shapes (`shape::Encode`, `shape::Decode`)**: How a type is laid out: scalar, pointer, record, sequence, map or dynamic. Records are described with the [`record!`] macro.
//! * **Encoder (`encoder::Encoder`)**: Walks a value through its shape and produces a node tree.
//! * **Decoder (`decoder::Decoder`)**: Maps every path a destination can be populated from, then applies the source records permissively.
//! * **Diff and merge (`diff`, `merge`)**: Leaf-level comparison and one-directional overlay of two trees.
//! * **Mapper (`mapper::Mapper`)**: The facade tying everything together under one set of `Options`.

pub mod codec;
pub mod decoder;
pub mod diff;
pub mod duration;
pub mod dynamic;
pub mod encoder;
pub mod mapper;
pub mod merge;
pub mod naming;
pub mod options;
pub mod shape;
pub mod time;
pub mod tree;

pub use decoder::{DecodeError, Decoder, PathMapping};
pub use diff::{NodeDiff, diff, diff_storages};
pub use dynamic::Dynamic;
pub use encoder::{EncodeError, Encoder};
pub use mapper::{Mapper, from_slice, from_slice_into, from_str, to_string, to_vec};
pub use merge::{unite, unite_storages};
pub use options::{KeyStyle, Options};
pub use shape::{
    CustomDecoder, CustomEncoder, Decode, Encode, Field, FieldTag, PointerSlot, ScalarSlot,
    SequenceSlot, Shape, Slot,
};
pub use tree::{Node, NodeRef, NodeStorage, Scalar};

/// Result type used throughout the Envtree library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Envtree library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured errors from the encoder module
    #[error(transparent)]
    Encode(encoder::EncodeError),

    /// Structured errors from the decoder module
    #[error(transparent)]
    Decode(decoder::DecodeError),

    /// Failure reported by a custom encoder or decoder
    #[error("{reason}")]
    Custom { reason: String },
}

impl Error {
    /// Creates an error for capability implementations to report.
    pub fn custom(reason: impl std::fmt::Display) -> Self {
        Error::Custom {
            reason: reason.to_string(),
        }
    }

    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Encode(_) => "encoder",
            Error::Decode(_) => "decoder",
            Error::Custom { .. } => "custom",
        }
    }

    /// Get the path at which the error happened, if it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Encode(err) => Some(err.path()),
            Error::Decode(err) => Some(err.path()),
            Error::Custom { .. } => None,
        }
    }

    /// Check if this error is an unsupported shape.
    pub fn is_unsupported_shape(&self) -> bool {
        match self {
            Error::Encode(err) => err.is_unsupported_shape(),
            Error::Decode(err) => err.is_unsupported_shape(),
            Error::Custom { .. } => false,
        }
    }

    /// Check if this error asks for a custom decoder.
    pub fn is_capability_required(&self) -> bool {
        match self {
            Error::Decode(err) => err.is_capability_required(),
            _ => false,
        }
    }

    /// Check if this error is a depth limit violation.
    pub fn is_depth_exceeded(&self) -> bool {
        match self {
            Error::Encode(err) => err.is_depth_exceeded(),
            Error::Decode(err) => err.is_depth_exceeded(),
            Error::Custom { .. } => false,
        }
    }

    /// Check if this error was reported by capability code.
    pub fn is_custom(&self) -> bool {
        match self {
            Error::Encode(err) => err.is_custom(),
            Error::Decode(err) => err.is_custom(),
            Error::Custom { .. } => true,
        }
    }
}
