//! Composite scoring and cross-granularity fusion.
//!
//! ```text
//! score = w_mean * mean_sim_adj + w_cov * coverage_min + w_max * max_sim + w_hits * hit_count_norm
//! final = w_s * sentence + w_p * paragraph
//! ```

mod engine;
mod error;
mod types;
mod weights;

#[cfg(test)]
mod tests;

pub use engine::ScoreEngine;
pub use error::ScoringError;
pub use types::PairScore;
pub use weights::{FusionWeights, ScoreWeights};
