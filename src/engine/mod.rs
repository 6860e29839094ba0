//! Batch orchestration.
//!
//! [`MatchEngine::run`] builds the segment store, then runs each enabled
//! granularity through embedding, indexing, retrieval and aggregation, and
//! finally fuses the per-granularity scores. A failure inside one granularity
//! is recorded in its [`GranularityResult`]; the other granularity still
//! reports.

mod error;
mod types;


pub use error::{EngineError, GranularityFailure};
pub use types::{
    BatchReport, BatchStage, BatchWarning, GranularityOutcome, GranularityResult,
    ScoredAggregate,
};

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::aggregate::{AggregationParams, aggregate};
use crate::budget::Deadline;
use crate::citation::CitationDetector;
use crate::config::EngineConfig;
use crate::corpus::{Granularity, SegmentRecord, SegmentStore};
use crate::embedding::{EmbeddingOracle, embed_segments};
use crate::index::GranularityIndex;
use crate::retrieval::{RetrievalParams, retrieve_all};
use crate::scoring::ScoreEngine;

/// Matching-and-scoring engine.
///
/// Configuration is validated and citation rules are compiled once in
/// [`MatchEngine::new`]; the engine can then run any number of batches.
pub struct MatchEngine {
    config: EngineConfig,
    detector: Option<CitationDetector>,
    scorer: ScoreEngine,
    oracle: Arc<dyn EmbeddingOracle>,
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("config", &self.config)
            .field("citation_check", &self.detector.is_some())
            .field("oracle", &self.oracle.name())
            .finish()
    }
}

impl MatchEngine {
    pub fn new(config: EngineConfig, oracle: Arc<dyn EmbeddingOracle>) -> Result<Self, EngineError> {
        config.validate()?;

        let detector = if config.citation_check {
            Some(CitationDetector::with_extra_rules(
                config.quote_min_fraction,
                config.citation_patterns.clone(),
            )?)
        } else {
            None
        };
        let scorer = ScoreEngine::new(config.score_weights, config.fusion_weights)?;

        Ok(Self {
            config,
            detector,
            scorer,
            oracle,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self) -> &ScoreEngine {
        &self.scorer
    }

    /// Runs one batch of segment records.
    pub fn run(&self, records: Vec<SegmentRecord>) -> Result<BatchReport, EngineError> {
        let deadline = Deadline::from_budget(self.config.batch_budget());
        let store = SegmentStore::build(records, self.detector.as_ref())?;
        Ok(self.run_store(&store, &deadline))
    }

    /// Runs a batch over an already built store.
    pub fn run_store(&self, store: &SegmentStore, deadline: &Deadline) -> BatchReport {
        let mut warnings = Vec::new();
        let mut granularities = Vec::with_capacity(Granularity::ALL.len());

        for granularity in Granularity::ALL {
            let result = if self.config.enabled_granularities().contains(&granularity) {
                self.run_granularity(store, granularity, deadline, &mut warnings)
            } else {
                debug!(%granularity, "Granularity disabled");
                GranularityResult::empty(granularity, GranularityOutcome::Disabled)
            };
            granularities.push(result);
        }

        let aggregates_of = |granularity: Granularity| -> Vec<_> {
            granularities
                .iter()
                .filter(|r| r.granularity == granularity)
                .flat_map(|r| r.aggregates().iter().map(|s| s.aggregate.clone()))
                .collect()
        };
        let pairs = self.scorer.score_pairs(
            &aggregates_of(Granularity::Sentence),
            &aggregates_of(Granularity::Paragraph),
        );

        let partial = warnings
            .iter()
            .any(|w| matches!(w, BatchWarning::BudgetExceeded { .. }));

        info!(
            pairs = pairs.len(),
            warnings = warnings.len(),
            partial,
            "Batch finished"
        );

        BatchReport {
            pairs,
            granularities,
            warnings,
            partial,
        }
    }

    fn run_granularity(
        &self,
        store: &SegmentStore,
        granularity: Granularity,
        deadline: &Deadline,
        warnings: &mut Vec<BatchWarning>,
    ) -> GranularityResult {
        let segments = store.segments(granularity);
        let mut result = GranularityResult::empty(granularity, GranularityOutcome::Completed(Vec::new()));
        result.segments = segments.len();

        if segments.is_empty() {
            debug!(%granularity, "No segments");
            return result;
        }

        let batch = match embed_segments(segments, self.oracle.as_ref(), self.config.execution, deadline) {
            Ok(batch) => batch,
            Err(e) => return failed(result, e.into()),
        };
        result.embedded = batch.embedded();

        for (id, failure) in &batch.failures {
            let segment = &segments[id.as_usize()];
            warnings.push(BatchWarning::MissingEmbedding {
                granularity,
                segment: *id,
                submission_id: segment.submission_id.clone(),
                document_id: segment.document_id.clone(),
                index: segment.index,
                reason: failure.to_string(),
            });
        }
        if batch.skipped > 0 {
            warnings.push(BatchWarning::BudgetExceeded {
                granularity,
                stage: BatchStage::Embedding,
                skipped: batch.skipped,
            });
        }

        let index = match GranularityIndex::build(
            granularity,
            segments,
            &batch.vectors,
            self.config.partitioning(),
            self.config.dims(),
        ) {
            Ok(index) => index,
            Err(e) => return failed(result, e.into()),
        };

        let settings = self.config.granularity(granularity);
        let retrieval = retrieve_all(
            &index,
            segments,
            &batch.vectors,
            RetrievalParams {
                top_k: settings.query_top_k,
                threshold: settings.threshold,
            },
            deadline,
        );
        result.hits = retrieval.hits.len();
        if retrieval.skipped > 0 {
            warnings.push(BatchWarning::BudgetExceeded {
                granularity,
                stage: BatchStage::Retrieval,
                skipped: retrieval.skipped,
            });
        }

        let outcome = aggregate(
            store,
            granularity,
            &retrieval.hits,
            AggregationParams {
                threshold: settings.threshold,
                evidence_cap: self.config.evidence_cap,
                citation_weights: self.config.effective_citation_weights(),
            },
        );
        warnings.extend(outcome.dropped.into_iter().map(BatchWarning::DroppedHit));

        let scored: Vec<ScoredAggregate> = outcome
            .aggregates
            .into_iter()
            .map(|aggregate| ScoredAggregate {
                score: self.scorer.score(&aggregate),
                aggregate,
            })
            .collect();

        info!(
            %granularity,
            segments = result.segments,
            embedded = result.embedded,
            hits = result.hits,
            pairs = scored.len(),
            "Granularity finished"
        );

        result.outcome = GranularityOutcome::Completed(scored);
        result
    }
}

fn failed(mut result: GranularityResult, failure: GranularityFailure) -> GranularityResult {
    error!(
        granularity = %result.granularity,
        error = %failure,
        "Granularity failed"
    );
    result.outcome = GranularityOutcome::Failed(failure);
    result
}
