//! Error types for detpost.

use thiserror::Error;

/// Result alias for detpost operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while configuring or running a decode.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The raw output buffer has no elements.
    #[error("raw output buffer is empty")]
    EmptyInput,
    /// The buffer length matches neither the per-class nor the class-id layout.
    #[error("unknown output format: length {len} fits neither {} nor 6 columns", .num_classes + 5)]
    UnknownFormat { len: usize, num_classes: usize },
    /// A class label set with no entries.
    #[error("class label set is empty")]
    EmptyLabels,
    /// A model, source or view dimension is zero.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A decode parameter is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}
