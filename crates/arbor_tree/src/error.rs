use alloc::string::String;

use thiserror::Error;

use crate::TreeType;

// -----------------------------------------------------------------------------
// Error

/// Error returned by checked scalar conversions such as [`Tree::to_scalar`].
///
/// [`Tree::to_scalar`]: crate::Tree::to_scalar
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeConversionError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: TreeType,
    },

    /// The value is out of range for `target`, or an integer has no exact
    /// `target` representation.
    #[error("value {value} does not fit into {target}")]
    Overflow { value: String, target: &'static str },
}
