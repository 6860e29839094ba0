//! Segment store: every sentence and paragraph of a batch, per submission.
//!
//! Splitting text into segments and detecting languages belongs to the
//! ingestion collaborator; this module only holds what it hands over.

pub mod error;
pub mod input;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::CorpusError;
pub use input::{CorpusFile, CorpusSegment};
pub use store::SegmentStore;
pub use types::{Document, Granularity, Segment, SegmentId, SegmentRecord, Submission};
