//! Serialized batch report.
//!
//! [`ReportDocument`] is the stable output contract of the crate: field names
//! follow the pair and evidence records downstream viewers already consume.
//! Bump [`REPORT_SCHEMA_VERSION`] whenever a field changes.


use serde::{Deserialize, Serialize};

use crate::aggregate::EvidenceHit;
use crate::constants::REPORT_SCHEMA_VERSION;
use crate::corpus::Granularity;
use crate::engine::{BatchReport, BatchWarning, GranularityOutcome, ScoredAggregate};

/// Fused score of one submission pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSummary {
    pub pair: (String, String),
    pub sentence_score: Option<f32>,
    pub paragraph_score: Option<f32>,
    pub score: f32,
}

/// One matched segment pair. Side `i` belongs to `pair.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub sid_i: String,
    pub sid_j: String,
    pub did_i: String,
    pub did_j: String,
    pub sent_id_i: u32,
    pub sent_id_j: u32,
    pub text_i: String,
    pub text_j: String,
    pub sim: f32,
    pub adjusted_sim: f32,
    pub citation_weight: f32,
}

/// Statistics and evidence of one (pair, granularity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub pair: (String, String),
    pub granularity: Granularity,
    pub count: usize,
    pub mean_sim: f32,
    pub mean_sim_adj: f32,
    pub max_sim: f32,
    pub coverage_min: f32,
    pub coverage_a: f32,
    pub coverage_b: f32,
    pub total_a: usize,
    pub total_b: usize,
    pub score: f32,
    pub evidence: Vec<EvidenceRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GranularityStatus {
    Completed,
    Disabled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GranularitySummary {
    pub granularity: Granularity,
    pub status: GranularityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub segments: usize,
    pub embedded: usize,
    pub hits: usize,
}

/// Top-level JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub schema_version: u32,
    pub partial: bool,
    /// Fused scores, highest first.
    pub pairs: Vec<PairSummary>,
    /// Per-granularity records, sentence first.
    pub details: Vec<PairRecord>,
    pub granularities: Vec<GranularitySummary>,
    pub warnings: Vec<BatchWarning>,
}

impl ReportDocument {
    pub fn from_batch(report: &BatchReport) -> Self {
        let pairs = report
            .pairs
            .iter()
            .map(|p| PairSummary {
                pair: (p.pair.a.clone(), p.pair.b.clone()),
                sentence_score: p.sentence_score,
                paragraph_score: p.paragraph_score,
                score: p.score,
            })
            .collect();

        let details = report
            .granularities
            .iter()
            .flat_map(|r| r.aggregates())
            .map(pair_record)
            .collect();

        let granularities = report
            .granularities
            .iter()
            .map(|r| {
                let (status, error) = match &r.outcome {
                    GranularityOutcome::Completed(_) => (GranularityStatus::Completed, None),
                    GranularityOutcome::Disabled => (GranularityStatus::Disabled, None),
                    GranularityOutcome::Failed(failure) => {
                        (GranularityStatus::Failed, Some(failure.to_string()))
                    }
                };
                GranularitySummary {
                    granularity: r.granularity,
                    status,
                    error,
                    segments: r.segments,
                    embedded: r.embedded,
                    hits: r.hits,
                }
            })
            .collect();

        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            partial: report.partial,
            pairs,
            details,
            granularities,
            warnings: report.warnings.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn pair_record(scored: &ScoredAggregate) -> PairRecord {
    let aggregate = &scored.aggregate;
    let (a, b) = (&aggregate.pair.a, &aggregate.pair.b);
    PairRecord {
        pair: (a.clone(), b.clone()),
        granularity: aggregate.granularity,
        count: aggregate.count,
        mean_sim: aggregate.mean_sim,
        mean_sim_adj: aggregate.mean_sim_adj,
        max_sim: aggregate.max_sim,
        coverage_min: aggregate.coverage_min,
        coverage_a: aggregate.coverage_a,
        coverage_b: aggregate.coverage_b,
        total_a: aggregate.total_a,
        total_b: aggregate.total_b,
        score: scored.score,
        evidence: aggregate
            .evidence
            .iter()
            .map(|e| evidence_record(a, b, e))
            .collect(),
    }
}

fn evidence_record(a: &str, b: &str, hit: &EvidenceHit) -> EvidenceRecord {
    EvidenceRecord {
        sid_i: a.to_string(),
        sid_j: b.to_string(),
        did_i: hit.document_i.clone(),
        did_j: hit.document_j.clone(),
        sent_id_i: hit.index_i,
        sent_id_j: hit.index_j,
        text_i: hit.text_i.clone(),
        text_j: hit.text_j.clone(),
        sim: hit.similarity,
        adjusted_sim: hit.adjusted_similarity,
        citation_weight: hit.citation_weight,
    }
}
