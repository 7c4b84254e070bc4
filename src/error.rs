//! Error types for protowire-writer.

use thiserror::Error;

use crate::protocol::MAX_BACKPATCH_LENGTH;

/// Main error type for all protowire operations.
#[derive(Debug, Error)]
pub enum WireError {
    /// A sub-message opened with `begin_field` grew too large for its
    /// fixed 3-byte length slot.
    #[error("Nested message of {length} bytes exceeds backpatch limit of {} bytes", MAX_BACKPATCH_LENGTH - 1)]
    NestedTooLarge {
        /// Payload length accumulated since the mark.
        length: usize,
    },
}

/// Result type alias using WireError.
pub type Result<T> = std::result::Result<T, WireError>;
