use thiserror::Error;

use super::types::Granularity;

/// Errors raised while building the segment store.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The same (submission, document, granularity, index) appeared twice.
    #[error(
        "duplicate {granularity} segment {index} in document '{document_id}' of submission '{submission_id}'"
    )]
    DuplicateSegment {
        submission_id: String,
        document_id: String,
        granularity: Granularity,
        index: u32,
    },

    /// A document id was reused by a different submission.
    #[error(
        "document '{document_id}' belongs to submission '{owner}' but was also listed under '{submission_id}'"
    )]
    DocumentOwnerConflict {
        document_id: String,
        owner: String,
        submission_id: String,
    },

    /// An identifier field was empty.
    #[error("empty {field} in segment record")]
    EmptyIdentifier { field: &'static str },

    /// More segments than a [`SegmentId`](super::SegmentId) can address.
    #[error("too many {granularity} segments: {count}")]
    TooManySegments {
        granularity: Granularity,
        count: usize,
    },
}
