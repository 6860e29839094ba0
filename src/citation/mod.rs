//! Citation detection.
//!
//! A segment is citation-bearing when any rule of an ordered [`CitationRule`]
//! list matches it. Flags are computed once per segment when the
//! [`SegmentStore`](crate::corpus::SegmentStore) is built, then copied onto every
//! hit the segment takes part in. [`CitationWeights`] turns a hit's two flags
//! into the multiplier used by aggregation and scoring.
//!
//! New citation styles are added by appending a rule (see
//! [`CitationRule::Pattern`]); matching and aggregation never look at rules.

pub mod error;
pub mod rules;
pub mod weights;

#[cfg(test)]
mod tests;

pub use error::CitationError;
pub use rules::CitationRule;
pub use weights::CitationWeights;

use rules::CompiledRule;

/// Stateless classifier over an ordered list of compiled rules.
#[derive(Debug, Clone)]
pub struct CitationDetector {
    rules: Vec<CompiledRule>,
}

impl CitationDetector {
    /// Compiles `rules`, keeping their order.
    pub fn new(rules: Vec<CitationRule>) -> Result<Self, CitationError> {
        let rules = rules
            .into_iter()
            .map(CitationRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// The built-in rules followed by `extra` caller-supplied ones.
    pub fn with_extra_rules(
        quote_min_fraction: f32,
        extra: Vec<CitationRule>,
    ) -> Result<Self, CitationError> {
        let mut rules = CitationRule::standard(quote_min_fraction);
        rules.extend(extra);
        Self::new(rules)
    }

    /// Returns `true` if any rule matches `text`.
    pub fn detect(&self, text: &str) -> bool {
        self.detect_rule(text).is_some()
    }

    /// Returns the first rule (in list order) that matches `text`.
    pub fn detect_rule(&self, text: &str) -> Option<&CitationRule> {
        self.rules
            .iter()
            .find(|compiled| compiled.matches(text))
            .map(|compiled| &compiled.rule)
    }

    pub fn rules(&self) -> impl Iterator<Item = &CitationRule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }
}

impl Default for CitationDetector {
    fn default() -> Self {
        Self::new(CitationRule::standard(crate::constants::DEFAULT_QUOTE_MIN_FRACTION))
            .expect("built-in citation rules always compile")
    }
}
