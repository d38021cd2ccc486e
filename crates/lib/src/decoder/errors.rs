//! Error types for decoding.
//!
//! Decoding is permissive about values: malformed scalar text never fails.
//! These errors cover structural problems in the destination type.

use thiserror::Error;

/// Errors raised while decoding into a value.
///
/// Every variant carries the full path at which decoding stopped.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The destination at `path` can only be decoded through a custom decoder
    #[error("Custom decoder required for '{shape}' at '{path}'")]
    CapabilityRequired { path: String, shape: String },

    /// The destination at `path` has a shape with no decoding
    #[error("Unsupported shape '{shape}' at '{path}'")]
    UnsupportedShape { path: String, shape: String },

    /// Nesting went deeper than the configured limit
    #[error("Maximum depth {limit} exceeded at '{path}'")]
    DepthExceeded { path: String, limit: usize },

    /// A custom decoder reported a failure
    #[error("Custom decoder failed at '{path}': {source}")]
    Custom {
        path: String,
        source: Box<crate::Error>,
    },
}

impl DecodeError {
    /// Check if this error asks for a custom decoder
    pub fn is_capability_required(&self) -> bool {
        matches!(self, DecodeError::CapabilityRequired { .. })
    }

    /// Check if this error is an unsupported shape
    pub fn is_unsupported_shape(&self) -> bool {
        matches!(self, DecodeError::UnsupportedShape { .. })
    }

    /// Check if this error is a depth limit violation
    pub fn is_depth_exceeded(&self) -> bool {
        matches!(self, DecodeError::DepthExceeded { .. })
    }

    /// Check if this error came from a custom decoder
    pub fn is_custom(&self) -> bool {
        matches!(self, DecodeError::Custom { .. })
    }

    /// Get the path at which decoding failed
    pub fn path(&self) -> &str {
        match self {
            DecodeError::CapabilityRequired { path, .. }
            | DecodeError::UnsupportedShape { path, .. }
            | DecodeError::DepthExceeded { path, .. }
            | DecodeError::Custom { path, .. } => path,
        }
    }
}

// Conversion from DecodeError to the main Error type
impl From<DecodeError> for crate::Error {
    fn from(err: DecodeError) -> Self {
        crate::Error::Decode(err)
    }
}
