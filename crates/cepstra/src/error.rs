//! Error types for feature extraction.

use thiserror::Error;

/// Result type for feature-extraction operations.
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Errors that can occur during feature extraction.
///
/// Every operation validates its configuration eagerly, before any numeric
/// work begins; a failure never leaves a partial result behind. All errors
/// are deterministic given the same inputs.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Invalid or mismatched parameter value.
    #[error("invalid parameter '{name}': {message}")]
    Configuration {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Requested mode or scaling is not implemented.
    #[error("unsupported: {message}")]
    Unsupported {
        /// Error message.
        message: String,
    },

    /// Input tensor dimensions are inconsistent with the operation.
    #[error("shape mismatch: {message}")]
    Shape {
        /// Error message.
        message: String,
    },
}

impl FeatureError {
    /// Creates a configuration error for a named parameter.
    pub fn config(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported-feature error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Creates a shape error.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }
}
