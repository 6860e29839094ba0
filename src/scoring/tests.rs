use super::*;
use crate::aggregate::{PairAggregate, SubmissionPair};
use crate::corpus::Granularity;

fn aggregate(a: &str, b: &str, granularity: Granularity) -> PairAggregate {
    PairAggregate {
        pair: SubmissionPair::new(a, b),
        granularity,
        count: 1,
        mean_sim: 0.95,
        mean_sim_adj: 0.95,
        max_sim: 0.95,
        coverage_a: 1.0,
        coverage_b: 1.0,
        coverage_min: 1.0,
        retrieved_hits: 1,
        total_a: 1,
        total_b: 1,
        evidence: Vec::new(),
    }
}

fn engine_with_cap(cap: usize) -> ScoreEngine {
    ScoreEngine::new(
        ScoreWeights {
            hit_count_cap: cap,
            ..ScoreWeights::default()
        },
        FusionWeights::default(),
    )
    .unwrap()
}

#[test]
fn test_composite_score_single_shared_sentence() {
    let engine = engine_with_cap(10);
    let score = engine.score(&aggregate("A", "B", Granularity::Sentence));

    let expected = 0.4 * 0.95 + 0.35 * 1.0 + 0.15 * 0.95 + 0.10 * 0.1;
    assert!((score - expected).abs() < 1e-6);
    assert!((score - 0.8825).abs() < 1e-6);
}

#[test]
fn test_hit_count_norm_saturates() {
    let engine = ScoreEngine::default();
    assert_eq!(engine.hit_count_norm(0), 0.0);
    assert_eq!(engine.hit_count_norm(25), 0.5);
    assert_eq!(engine.hit_count_norm(50), 1.0);
    assert_eq!(engine.hit_count_norm(500), 1.0);
}

#[test]
fn test_score_is_clamped() {
    let engine = ScoreEngine::default();
    let mut agg = aggregate("A", "B", Granularity::Sentence);
    agg.count = 1000;
    agg.mean_sim_adj = 1.0;
    agg.max_sim = 1.0;
    let score = engine.score(&agg);
    assert!((0.0..=1.0).contains(&score));
}

#[test]
fn test_fuse_single_granularity_is_exact() {
    let engine = ScoreEngine::default();
    let s = 0.123_456_79_f32;
    assert_eq!(engine.fuse(Some(s), None), Some(s));
    assert_eq!(engine.fuse(None, Some(s)), Some(s));
    assert_eq!(engine.fuse(None, None), None);
}

#[test]
fn test_fuse_both_granularities() {
    let engine = ScoreEngine::default();
    let fused = engine.fuse(Some(0.5), Some(1.0)).unwrap();
    assert!((fused - (0.4 * 0.5 + 0.6 * 1.0)).abs() < 1e-6);
}

#[test]
fn test_score_pairs_merges_granularities_and_sorts() {
    let engine = engine_with_cap(10);
    let mut weak = aggregate("C", "A", Granularity::Sentence);
    weak.mean_sim_adj = 0.5;
    weak.max_sim = 0.5;
    weak.coverage_min = 0.1;

    let sentence = vec![aggregate("A", "B", Granularity::Sentence), weak];
    let paragraph = vec![aggregate("B", "A", Granularity::Paragraph)];

    let scores = engine.score_pairs(&sentence, &paragraph);
    assert_eq!(scores.len(), 2);

    assert_eq!(scores[0].pair, SubmissionPair::new("A", "B"));
    assert!(scores[0].sentence_score.is_some());
    assert!(scores[0].paragraph_score.is_some());

    assert_eq!(scores[1].pair, SubmissionPair::new("A", "C"));
    assert_eq!(scores[1].paragraph_score, None);
    assert_eq!(Some(scores[1].score), scores[1].sentence_score);
}

#[test]
fn test_score_pairs_tie_break_by_pair() {
    let engine = ScoreEngine::default();
    let sentence = vec![
        aggregate("C", "D", Granularity::Sentence),
        aggregate("A", "B", Granularity::Sentence),
    ];
    let scores = engine.score_pairs(&sentence, &[]);
    assert_eq!(scores[0].pair, SubmissionPair::new("A", "B"));
    assert_eq!(scores[1].pair, SubmissionPair::new("C", "D"));
}

#[test]
fn test_weight_validation() {
    assert!(ScoreWeights::default().validate().is_ok());
    assert!(FusionWeights::default().validate().is_ok());

    let bad_sum = ScoreWeights {
        mean_sim: 0.5,
        ..ScoreWeights::default()
    };
    assert!(matches!(
        bad_sum.validate(),
        Err(ScoringError::WeightSum { kind: "score", .. })
    ));

    let negative = ScoreWeights {
        mean_sim: 0.6,
        coverage: -0.1,
        max_sim: 0.4,
        hit_count: 0.1,
        hit_count_cap: 50,
    };
    assert!(matches!(
        negative.validate(),
        Err(ScoringError::InvalidWeight { name: "coverage", .. })
    ));

    let zero_cap = ScoreWeights {
        hit_count_cap: 0,
        ..ScoreWeights::default()
    };
    assert_eq!(zero_cap.validate(), Err(ScoringError::ZeroHitCountCap));

    let inverted = FusionWeights {
        sentence: 0.6,
        paragraph: 0.4,
    };
    assert!(matches!(
        inverted.validate(),
        Err(ScoringError::FusionOrder { .. })
    ));
    assert!(ScoreEngine::new(ScoreWeights::default(), inverted).is_err());
}
