use thiserror::Error;

/// Invalid scoring or fusion weights.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("weight '{name}' must be a finite non-negative number, got {value}")]
    InvalidWeight { name: &'static str, value: f32 },

    #[error("{kind} weights must sum to 1, got {sum}")]
    WeightSum { kind: &'static str, sum: f32 },

    #[error(
        "paragraph fusion weight ({paragraph}) must exceed sentence fusion weight ({sentence})"
    )]
    FusionOrder { sentence: f32, paragraph: f32 },

    #[error("hit count cap must be at least 1")]
    ZeroHitCountCap,
}
