use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CITATION_WEIGHT_BOTH, DEFAULT_CITATION_WEIGHT_NONE, DEFAULT_CITATION_WEIGHT_ONE,
};

use super::error::CitationError;

/// Multipliers applied to a hit's similarity depending on how many of its two
/// sides carry citation markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationWeights {
    pub neither: f32,
    pub one_side: f32,
    pub both_sides: f32,
}

impl Default for CitationWeights {
    fn default() -> Self {
        Self {
            neither: DEFAULT_CITATION_WEIGHT_NONE,
            one_side: DEFAULT_CITATION_WEIGHT_ONE,
            both_sides: DEFAULT_CITATION_WEIGHT_BOTH,
        }
    }
}

impl CitationWeights {
    /// Weights that leave every hit untouched.
    pub fn disabled() -> Self {
        Self {
            neither: 1.0,
            one_side: 1.0,
            both_sides: 1.0,
        }
    }

    /// Multiplier for a hit whose sides carry the given citation flags.
    #[inline]
    pub fn weight(&self, citation_a: bool, citation_b: bool) -> f32 {
        match (citation_a, citation_b) {
            (false, false) => self.neither,
            (true, true) => self.both_sides,
            _ => self.one_side,
        }
    }

    /// `similarity` scaled by [`weight`](Self::weight).
    #[inline]
    pub fn adjust(&self, similarity: f32, citation_a: bool, citation_b: bool) -> f32 {
        similarity * self.weight(citation_a, citation_b)
    }

    pub fn validate(&self) -> Result<(), CitationError> {
        for (name, value) in [
            ("neither", self.neither),
            ("one_side", self.one_side),
            ("both_sides", self.both_sides),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CitationError::WeightOutOfRange { name, value });
            }
        }
        Ok(())
    }
}
