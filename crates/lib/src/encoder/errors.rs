//! Error types for encoding.

use thiserror::Error;

/// Errors raised while encoding a value.
///
/// Every variant carries the full path at which encoding stopped.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The value at `path` has a shape with no encoding
    #[error("Unsupported shape '{shape}' at '{path}'")]
    UnsupportedShape { path: String, shape: String },

    /// Nesting went deeper than the configured limit
    #[error("Maximum depth {limit} exceeded at '{path}'")]
    DepthExceeded { path: String, limit: usize },

    /// A custom encoder reported a failure
    #[error("Custom encoder failed at '{path}': {source}")]
    Custom {
        path: String,
        source: Box<crate::Error>,
    },
}

impl EncodeError {
    /// Check if this error is an unsupported shape
    pub fn is_unsupported_shape(&self) -> bool {
        matches!(self, EncodeError::UnsupportedShape { .. })
    }

    /// Check if this error is a depth limit violation
    pub fn is_depth_exceeded(&self) -> bool {
        matches!(self, EncodeError::DepthExceeded { .. })
    }

    /// Check if this error came from a custom encoder
    pub fn is_custom(&self) -> bool {
        matches!(self, EncodeError::Custom { .. })
    }

    /// Get the path at which encoding failed
    pub fn path(&self) -> &str {
        match self {
            EncodeError::UnsupportedShape { path, .. }
            | EncodeError::DepthExceeded { path, .. }
            | EncodeError::Custom { path, .. } => path,
        }
    }
}

// Conversion from EncodeError to the main Error type
impl From<EncodeError> for crate::Error {
    fn from(err: EncodeError) -> Self {
        crate::Error::Encode(err)
    }
}
