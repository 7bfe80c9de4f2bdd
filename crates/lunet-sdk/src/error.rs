//! Error types for the marshalling layer

use crate::value::TypeTag;

/// Result type for marshalling operations
pub type MarshalResult<T> = Result<T, MarshalError>;

/// Marshalling error taxonomy.
///
/// Every variant is recoverable. A failure inside an unprotected call is
/// *not* represented here — that path is fatal by contract (see the `call`
/// façade). Permissive-mode read mismatches are not errors either; they
/// surface as a stopping position (see [`crate::StackReader::read_into`]).
///
/// Messages are self-sufficient: they name the offending position and both
/// the expected and actual type identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
    /// Strict-mode read found a stack slot of the wrong runtime type
    #[error(
        "type mismatch: expected {expected} (tag {tag_id}), got {actual} at position {position}",
        tag_id = .expected.id()
    )]
    TypeMismatch {
        /// Type the destination slot resolves to
        expected: TypeTag,
        /// Stack position of the offending value
        position: usize,
        /// Tag actually found on the stack
        actual: TypeTag,
    },

    /// Table lookup on a key that is not present
    #[error("no such key: \"{key}\"")]
    KeyNotFound {
        /// The missing key
        key: String,
    },

    /// Table lookup where the stored tag differs from the expected type
    #[error(
        "type mismatch at key \"{key}\": expected {expected} (tag {tag_id}), got {actual}",
        tag_id = .expected.id()
    )]
    KeyMismatch {
        /// The offending key
        key: String,
        /// Type the destination resolves to
        expected: TypeTag,
        /// Tag actually stored under the key
        actual: TypeTag,
    },

    /// Not enough values remain on the stack for the remaining destinations
    #[error(
        "stack underflow reading {expected} at position {position}: \
         {needed} destinations remain, {remaining} values on the stack"
    )]
    StackUnderflow {
        /// Type of the destination being read when the shortfall was found
        expected: TypeTag,
        /// Stack position the read would have consumed
        position: usize,
        /// Destinations left in the read sequence (including this one)
        needed: usize,
        /// Values actually left on the stack
        remaining: usize,
    },

    /// Runtime-side failure surfaced through a [`crate::StackContext`] method
    #[error("{0}")]
    Runtime(String),
}

impl From<String> for MarshalError {
    fn from(s: String) -> Self {
        MarshalError::Runtime(s)
    }
}

impl From<&str> for MarshalError {
    fn from(s: &str) -> Self {
        MarshalError::Runtime(s.to_string())
    }
}
