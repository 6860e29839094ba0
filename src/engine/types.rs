use serde::{Deserialize, Serialize};

use crate::aggregate::{DroppedHit, PairAggregate};
use crate::corpus::{Granularity, SegmentId};
use crate::scoring::PairScore;

use super::error::GranularityFailure;

/// A pair aggregate and its composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAggregate {
    pub aggregate: PairAggregate,
    pub score: f32,
}

/// Pipeline stage a budget expiry interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStage {
    Embedding,
    Retrieval,
}

/// Non-fatal issue recorded while running a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchWarning {
    /// The oracle failed on a segment; it was left out of matching but still
    /// counts toward coverage.
    MissingEmbedding {
        granularity: Granularity,
        segment: SegmentId,
        submission_id: String,
        document_id: String,
        index: u32,
        reason: String,
    },
    /// A hit could not be aggregated.
    DroppedHit(DroppedHit),
    /// The batch budget expired; `skipped` units of work were not done.
    BudgetExceeded {
        granularity: Granularity,
        stage: BatchStage,
        skipped: usize,
    },
}

/// What happened to one granularity.
#[derive(Debug, Clone, PartialEq)]
pub enum GranularityOutcome {
    /// Scored aggregates sorted by pair.
    Completed(Vec<ScoredAggregate>),
    /// Turned off by configuration.
    Disabled,
    Failed(GranularityFailure),
}

/// Per-granularity result and counters.
#[derive(Debug, Clone, PartialEq)]
pub struct GranularityResult {
    pub granularity: Granularity,
    pub outcome: GranularityOutcome,
    pub segments: usize,
    pub embedded: usize,
    pub hits: usize,
}

impl GranularityResult {
    pub(crate) fn empty(granularity: Granularity, outcome: GranularityOutcome) -> Self {
        Self {
            granularity,
            outcome,
            segments: 0,
            embedded: 0,
            hits: 0,
        }
    }

    pub fn aggregates(&self) -> &[ScoredAggregate] {
        match &self.outcome {
            GranularityOutcome::Completed(aggregates) => aggregates,
            _ => &[],
        }
    }

    pub fn failure(&self) -> Option<&GranularityFailure> {
        match &self.outcome {
            GranularityOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Everything a batch produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Fused scores ordered by score descending.
    pub pairs: Vec<PairScore>,
    /// Sentence result first, then paragraph.
    pub granularities: Vec<GranularityResult>,
    pub warnings: Vec<BatchWarning>,
    /// `true` when the batch budget cut work short.
    pub partial: bool,
}

impl BatchReport {
    pub fn granularity(&self, granularity: Granularity) -> Option<&GranularityResult> {
        self.granularities
            .iter()
            .find(|r| r.granularity == granularity)
    }

    /// Fused score of the pair `{a, b}`, in either order.
    pub fn score(&self, a: &str, b: &str) -> Option<f32> {
        let pair = crate::aggregate::SubmissionPair::new(a, b);
        self.pairs.iter().find(|p| p.pair == pair).map(|p| p.score)
    }
}
