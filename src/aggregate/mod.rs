//! Pair aggregation.
//!
//! Hits are grouped by the canonical pair of submissions they connect. Each
//! group is finalized independently: citation weights decide which hits
//! qualify, and the qualifying hits drive count, similarity and coverage.
//! Evidence keeps the strongest hits by raw similarity, dampened or not.

pub mod types;


pub use types::{
    AggregationOutcome, AggregationParams, DropReason, DroppedHit, EvidenceHit, PairAggregate,
    SubmissionPair,
};

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::corpus::{Granularity, Segment, SegmentStore};
use crate::retrieval::MatchHit;

/// A hit with side `a` on the lexicographically smaller submission.
#[derive(Debug, Clone, Copy)]
struct OrientedHit<'a> {
    a: &'a Segment,
    b: &'a Segment,
    similarity: f32,
    citation_a: bool,
    citation_b: bool,
}

impl OrientedHit<'_> {
    fn canonical_order(&self, other: &Self) -> Ordering {
        (&self.a.document_id, self.a.index, &self.b.document_id, self.b.index).cmp(&(
            &other.a.document_id,
            other.a.index,
            &other.b.document_id,
            other.b.index,
        ))
    }
}

#[derive(Default)]
struct Accumulator<'a> {
    groups: HashMap<(u32, u32), Vec<OrientedHit<'a>>>,
    dropped: Vec<DroppedHit>,
}

impl<'a> Accumulator<'a> {
    fn push(&mut self, store: &'a SegmentStore, granularity: Granularity, hit: &MatchHit) {
        let dropped_as = |reason| DroppedHit {
            granularity,
            seg_i: hit.seg_i,
            seg_j: hit.seg_j,
            reason,
        };

        let (Some(i), Some(j)) = (store.get(granularity, hit.seg_i), store.get(granularity, hit.seg_j))
        else {
            self.dropped.push(dropped_as(DropReason::UnknownSegment));
            return;
        };
        if i.submission_ordinal == j.submission_ordinal {
            self.dropped.push(dropped_as(DropReason::SameSubmission));
            return;
        }

        let oriented = if i.submission_id < j.submission_id {
            OrientedHit {
                a: i,
                b: j,
                similarity: hit.similarity,
                citation_a: hit.citation_i,
                citation_b: hit.citation_j,
            }
        } else {
            OrientedHit {
                a: j,
                b: i,
                similarity: hit.similarity,
                citation_a: hit.citation_j,
                citation_b: hit.citation_i,
            }
        };

        self.groups
            .entry((oriented.a.submission_ordinal, oriented.b.submission_ordinal))
            .or_default()
            .push(oriented);
    }

    fn merge(mut self, other: Self) -> Self {
        for (key, hits) in other.groups {
            self.groups.entry(key).or_default().extend(hits);
        }
        self.dropped.extend(other.dropped);
        self
    }
}

/// Groups `hits` per submission pair and computes each pair's statistics.
pub fn aggregate(
    store: &SegmentStore,
    granularity: Granularity,
    hits: &[MatchHit],
    params: AggregationParams,
) -> AggregationOutcome {
    let accumulator = hits
        .par_iter()
        .fold(Accumulator::default, |mut acc, hit| {
            acc.push(store, granularity, hit);
            acc
        })
        .reduce(Accumulator::default, Accumulator::merge);

    let mut dropped = accumulator.dropped;
    dropped.sort_by_key(|d| (d.seg_i, d.seg_j));
    if !dropped.is_empty() {
        warn!(
            %granularity,
            dropped = dropped.len(),
            "Dropped inconsistent hits during aggregation"
        );
    }

    let groups: Vec<Vec<OrientedHit<'_>>> = accumulator.groups.into_values().collect();
    let mut aggregates: Vec<PairAggregate> = groups
        .into_par_iter()
        .filter_map(|hits| finalize(store, granularity, hits, &params))
        .collect();
    aggregates.sort_by(|x, y| x.pair.cmp(&y.pair));

    debug!(
        %granularity,
        hits = hits.len(),
        pairs = aggregates.len(),
        "Aggregation finished"
    );

    AggregationOutcome {
        aggregates,
        dropped,
    }
}

fn finalize(
    store: &SegmentStore,
    granularity: Granularity,
    mut hits: Vec<OrientedHit<'_>>,
    params: &AggregationParams,
) -> Option<PairAggregate> {
    let first = *hits.first()?;
    hits.sort_by(|x, y| x.canonical_order(y));

    let mut count = 0usize;
    let mut sum_raw = 0f64;
    let mut sum_adjusted = 0f64;
    let mut max_sim = 0f32;
    let mut seen_a = HashSet::new();
    let mut seen_b = HashSet::new();

    for hit in &hits {
        let adjusted = params
            .citation_weights
            .adjust(hit.similarity, hit.citation_a, hit.citation_b);
        sum_adjusted += f64::from(adjusted);
        if adjusted >= params.threshold {
            count += 1;
            sum_raw += f64::from(hit.similarity);
            max_sim = max_sim.max(hit.similarity);
            seen_a.insert(hit.a.id);
            seen_b.insert(hit.b.id);
        }
    }

    if count == 0 {
        return None;
    }

    let total_a = store.total_segments_by_ordinal(first.a.submission_ordinal, granularity);
    let total_b = store.total_segments_by_ordinal(first.b.submission_ordinal, granularity);
    let coverage_a = ratio(seen_a.len(), total_a);
    let coverage_b = ratio(seen_b.len(), total_b);

    // Stable sort over the canonical order keeps (document, index) tie-breaks.
    let mut ranked: Vec<&OrientedHit<'_>> = hits.iter().collect();
    ranked.sort_by(|x, y| {
        y.similarity
            .partial_cmp(&x.similarity)
            .unwrap_or(Ordering::Equal)
    });
    let evidence = ranked
        .into_iter()
        .take(params.evidence_cap)
        .map(|hit| {
            let weight = params.citation_weights.weight(hit.citation_a, hit.citation_b);
            EvidenceHit {
                seg_i: hit.a.id,
                seg_j: hit.b.id,
                document_i: hit.a.document_id.clone(),
                document_j: hit.b.document_id.clone(),
                index_i: hit.a.index,
                index_j: hit.b.index,
                text_i: hit.a.text.clone(),
                text_j: hit.b.text.clone(),
                similarity: hit.similarity,
                adjusted_similarity: hit.similarity * weight,
                citation_weight: weight,
                citation_i: hit.citation_a,
                citation_j: hit.citation_b,
            }
        })
        .collect();

    Some(PairAggregate {
        pair: SubmissionPair::new(&first.a.submission_id, &first.b.submission_id),
        granularity,
        count,
        mean_sim: clamp_unit((sum_raw / count as f64) as f32),
        mean_sim_adj: clamp_unit((sum_adjusted / hits.len() as f64) as f32),
        max_sim: clamp_unit(max_sim),
        coverage_a,
        coverage_b,
        coverage_min: coverage_a.min(coverage_b),
        retrieved_hits: hits.len(),
        total_a,
        total_b,
        evidence,
    })
}

fn ratio(part: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    clamp_unit(part as f32 / total as f32)
}

#[inline]
fn clamp_unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
