use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FUSION_PARAGRAPH, DEFAULT_FUSION_SENTENCE, DEFAULT_HIT_COUNT_CAP,
    DEFAULT_WEIGHT_COVERAGE, DEFAULT_WEIGHT_HIT_COUNT, DEFAULT_WEIGHT_MAX_SIM,
    DEFAULT_WEIGHT_MEAN_SIM, WEIGHT_SUM_TOLERANCE,
};

use super::error::ScoringError;

/// Weights of the per-granularity composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub mean_sim: f32,
    pub coverage: f32,
    pub max_sim: f32,
    pub hit_count: f32,
    /// Hit count at which the hit-count term saturates.
    pub hit_count_cap: usize,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            mean_sim: DEFAULT_WEIGHT_MEAN_SIM,
            coverage: DEFAULT_WEIGHT_COVERAGE,
            max_sim: DEFAULT_WEIGHT_MAX_SIM,
            hit_count: DEFAULT_WEIGHT_HIT_COUNT,
            hit_count_cap: DEFAULT_HIT_COUNT_CAP,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<(), ScoringError> {
        let terms = [
            ("mean_sim", self.mean_sim),
            ("coverage", self.coverage),
            ("max_sim", self.max_sim),
            ("hit_count", self.hit_count),
        ];
        for (name, value) in terms {
            check_weight(name, value)?;
        }
        check_sum("score", terms.iter().map(|(_, w)| w).sum())?;
        if self.hit_count_cap == 0 {
            return Err(ScoringError::ZeroHitCountCap);
        }
        Ok(())
    }
}

/// Weights combining the sentence and paragraph scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub sentence: f32,
    pub paragraph: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            sentence: DEFAULT_FUSION_SENTENCE,
            paragraph: DEFAULT_FUSION_PARAGRAPH,
        }
    }
}

impl FusionWeights {
    pub fn validate(&self) -> Result<(), ScoringError> {
        check_weight("sentence", self.sentence)?;
        check_weight("paragraph", self.paragraph)?;
        check_sum("fusion", self.sentence + self.paragraph)?;
        if self.paragraph <= self.sentence {
            return Err(ScoringError::FusionOrder {
                sentence: self.sentence,
                paragraph: self.paragraph,
            });
        }
        Ok(())
    }
}

fn check_weight(name: &'static str, value: f32) -> Result<(), ScoringError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ScoringError::InvalidWeight { name, value });
    }
    Ok(())
}

fn check_sum(kind: &'static str, sum: f32) -> Result<(), ScoringError> {
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ScoringError::WeightSum { kind, sum });
    }
    Ok(())
}
