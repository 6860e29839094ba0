use serde::{Deserialize, Serialize};

use crate::aggregate::SubmissionPair;

/// Final score of one submission pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub pair: SubmissionPair,
    /// Composite sentence score, if the pair has sentence evidence.
    pub sentence_score: Option<f32>,
    /// Composite paragraph score, if the pair has paragraph evidence.
    pub paragraph_score: Option<f32>,
    /// Fused score.
    pub score: f32,
}
