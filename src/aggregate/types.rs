use serde::{Deserialize, Serialize};

use crate::citation::CitationWeights;
use crate::corpus::{Granularity, SegmentId};

/// Unordered pair of submission ids, stored lexicographically ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionPair {
    pub a: String,
    pub b: String,
}

impl SubmissionPair {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        let (x, y) = (x.into(), y.into());
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    pub fn contains(&self, submission_id: &str) -> bool {
        self.a == submission_id || self.b == submission_id
    }
}

impl std::fmt::Display for SubmissionPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// One matched segment pair kept as evidence. Side `i` belongs to submission `a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceHit {
    pub seg_i: SegmentId,
    pub seg_j: SegmentId,
    pub document_i: String,
    pub document_j: String,
    pub index_i: u32,
    pub index_j: u32,
    pub text_i: String,
    pub text_j: String,
    /// Raw similarity.
    pub similarity: f32,
    pub adjusted_similarity: f32,
    pub citation_weight: f32,
    pub citation_i: bool,
    pub citation_j: bool,
}

/// Statistics for one (submission pair, granularity) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairAggregate {
    pub pair: SubmissionPair,
    pub granularity: Granularity,
    /// Hits whose adjusted similarity reaches the threshold.
    pub count: usize,
    /// Mean raw similarity of qualifying hits.
    pub mean_sim: f32,
    /// Mean adjusted similarity of every retrieved hit of the pair.
    pub mean_sim_adj: f32,
    /// Max raw similarity of qualifying hits.
    pub max_sim: f32,
    pub coverage_a: f32,
    pub coverage_b: f32,
    pub coverage_min: f32,
    /// Hits retrieved for the pair before citation dampening.
    pub retrieved_hits: usize,
    pub total_a: usize,
    pub total_b: usize,
    pub evidence: Vec<EvidenceHit>,
}

/// Aggregation knobs for one granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationParams {
    pub threshold: f32,
    pub evidence_cap: usize,
    pub citation_weights: CitationWeights,
}

/// Why a hit was left out of aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// A side does not exist in the store.
    UnknownSegment,
    /// Both sides belong to the same submission.
    SameSubmission,
}

/// A hit that could not be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroppedHit {
    pub granularity: Granularity,
    pub seg_i: SegmentId,
    pub seg_j: SegmentId,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    /// Aggregates with at least one qualifying hit, sorted by pair.
    pub aggregates: Vec<PairAggregate>,
    pub dropped: Vec<DroppedHit>,
}
