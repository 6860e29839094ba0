use thiserror::Error;

use crate::corpus::{Granularity, SegmentId};

/// Errors returned while building a vector index.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndexError {
    /// A vector's length disagrees with the index dimension.
    #[error("invalid vector dimension for segment {segment}: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        segment: SegmentId,
    },

    /// A vector has no components.
    #[error("empty vector for segment {segment}")]
    ZeroDimension { segment: SegmentId },

    /// A vector contains NaN or infinity.
    #[error("non-finite component at position {position} in vector of segment {segment}")]
    NonFiniteComponent { segment: SegmentId, position: usize },

    /// The vector table does not line up with the segment table.
    #[error("{granularity} index expects {segments} vector slots, got {vectors}")]
    LengthMismatch {
        granularity: Granularity,
        segments: usize,
        vectors: usize,
    },
}
