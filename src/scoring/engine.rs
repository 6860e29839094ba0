use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::aggregate::{PairAggregate, SubmissionPair};

use super::error::ScoringError;
use super::types::PairScore;
use super::weights::{FusionWeights, ScoreWeights};

/// Turns pair aggregates into composite and fused scores.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreEngine {
    weights: ScoreWeights,
    fusion: FusionWeights,
}

impl ScoreEngine {
    pub fn new(weights: ScoreWeights, fusion: FusionWeights) -> Result<Self, ScoringError> {
        weights.validate()?;
        fusion.validate()?;
        Ok(Self { weights, fusion })
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn fusion(&self) -> &FusionWeights {
        &self.fusion
    }

    /// `min(count, cap) / cap`.
    pub fn hit_count_norm(&self, count: usize) -> f32 {
        let cap = self.weights.hit_count_cap.max(1);
        count.min(cap) as f32 / cap as f32
    }

    /// Composite score of one granularity, in `[0, 1]`.
    pub fn score(&self, aggregate: &PairAggregate) -> f32 {
        let w = &self.weights;
        let score = w.mean_sim * aggregate.mean_sim_adj
            + w.coverage * aggregate.coverage_min
            + w.max_sim * aggregate.max_sim
            + w.hit_count * self.hit_count_norm(aggregate.count);
        score.clamp(0.0, 1.0)
    }

    /// Weighted combination of the granularities that have data.
    ///
    /// Weights renormalize over the present scores, so a single present score is
    /// returned unchanged.
    pub fn fuse(&self, sentence: Option<f32>, paragraph: Option<f32>) -> Option<f32> {
        match (sentence, paragraph) {
            (Some(s), Some(p)) => {
                let total = self.fusion.sentence + self.fusion.paragraph;
                let fused = (self.fusion.sentence * s + self.fusion.paragraph * p) / total;
                Some(fused.clamp(0.0, 1.0))
            }
            (Some(s), None) => Some(s),
            (None, Some(p)) => Some(p),
            (None, None) => None,
        }
    }

    /// Scores every pair present at either granularity.
    ///
    /// Output is ordered by fused score descending, ties by pair.
    pub fn score_pairs(
        &self,
        sentence: &[PairAggregate],
        paragraph: &[PairAggregate],
    ) -> Vec<PairScore> {
        let mut by_pair: BTreeMap<&SubmissionPair, (Option<f32>, Option<f32>)> = BTreeMap::new();
        for aggregate in sentence {
            by_pair.entry(&aggregate.pair).or_default().0 = Some(self.score(aggregate));
        }
        for aggregate in paragraph {
            by_pair.entry(&aggregate.pair).or_default().1 = Some(self.score(aggregate));
        }

        let mut scores: Vec<PairScore> = by_pair
            .into_iter()
            .filter_map(|(pair, (sentence_score, paragraph_score))| {
                self.fuse(sentence_score, paragraph_score)
                    .map(|score| PairScore {
                        pair: pair.clone(),
                        sentence_score,
                        paragraph_score,
                        score,
                    })
            })
            .collect();

        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.pair.cmp(&b.pair))
        });

        debug!(pairs = scores.len(), "Pair scores computed");
        scores
    }
}
