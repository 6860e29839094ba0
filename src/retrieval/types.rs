use serde::{Deserialize, Serialize};

use crate::corpus::{Granularity, SegmentId};

/// Unordered pair of segments, stored with the smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentPairKey {
    pub low: SegmentId,
    pub high: SegmentId,
}

impl SegmentPairKey {
    pub fn new(a: SegmentId, b: SegmentId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

/// A candidate match between two segments of the same granularity.
///
/// `seg_i < seg_j` always holds. Citation flags are copied from the segments
/// when the hit is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchHit {
    pub granularity: Granularity,
    pub seg_i: SegmentId,
    pub seg_j: SegmentId,
    /// Raw cosine similarity in `[0, 1]`.
    pub similarity: f32,
    pub citation_i: bool,
    pub citation_j: bool,
}

impl MatchHit {
    pub fn key(&self) -> SegmentPairKey {
        SegmentPairKey {
            low: self.seg_i,
            high: self.seg_j,
        }
    }
}

/// Retrieval knobs for one granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalParams {
    /// Neighbors requested per query.
    pub top_k: usize,
    /// Minimum raw similarity.
    pub threshold: f32,
}

/// Result of a retrieval pass over one granularity.
#[derive(Debug, Clone, Default)]
pub struct RetrievalOutcome {
    /// Deduplicated hits sorted by [`SegmentPairKey`].
    pub hits: Vec<MatchHit>,
    /// Segments that were queried.
    pub queried: usize,
    /// Segments with a vector left unqueried because the deadline expired.
    pub skipped: usize,
}
