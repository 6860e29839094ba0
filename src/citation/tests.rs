use super::*;

fn detector() -> CitationDetector {
    CitationDetector::default()
}

#[test]
fn test_bracketed_index_references() {
    let d = detector();
    for text in [
        "Transformers dominate sequence modelling [1].",
        "This was shown twice [2,3].",
        "See the survey [4 - 6] for details.",
    ] {
        assert_eq!(
            d.detect_rule(text).map(CitationRule::name),
            Some("bracketed_index"),
            "{text}"
        );
    }
}

#[test]
fn test_bracket_without_number_is_not_citation() {
    let d = detector();
    assert!(!d.detect("The array [a, b] holds two values."));
}

#[test]
fn test_author_year_references() {
    let d = detector();
    for text in [
        "Attention is all you need (Vaswani, 2017).",
        "Prior work agrees (Smith et al., 2019).",
        "Prior work agrees (Smith et al. 2019).",
        "Both found it (Smith & Jones, 2018; Lee, 2021).",
        "该结论已被证实（张三，2020）。",
        "Vaccination rates fell (World Health Organization, 2020).",
        "The effect replicated (Smith, Jones, & Lee, 2018).",
        "The effect replicated (Smith and Jones 2018).",
        "Soil acidity matters (van der Berg, 2019).",
        "Others disagree (see Smith, 2020).",
    ] {
        assert_eq!(
            d.detect_rule(text).map(CitationRule::name),
            Some("author_year"),
            "{text}"
        );
    }
}

#[test]
fn test_parenthetical_year_without_author_is_not_citation() {
    let d = detector();
    assert!(!d.detect("The law passed (in 2020) after long debate."));
}

#[test]
fn test_quotation_spanning_large_fraction() {
    let d = detector();
    let text = r#"He wrote "the unexamined life is not worth living" in prison."#;
    assert_eq!(d.detect_rule(text).map(CitationRule::name), Some("quotation"));

    let text = "她说：「学而不思则罔，思而不学则殆」。";
    assert_eq!(d.detect_rule(text).map(CitationRule::name), Some("quotation"));

    let text = "The motto was “move fast and break things” for years.";
    assert!(d.detect(text));
}

#[test]
fn test_short_quotation_below_fraction_is_ignored() {
    let d = detector();
    let text = r#"The so-called "gap" between theory and practice has been discussed extensively in many engineering textbooks over the past decades."#;
    assert!(!d.detect(text));
}

#[test]
fn test_nested_quotation_counts_once() {
    let d = detector();
    let plain = r#"The contractor ordered many boards and nails for the shed, then said "use longer ones" twice."#;
    let nested = r#"The contractor ordered many boards and nails for the shed, then said "use 'longer' ones" twice."#;

    assert!(!d.detect(plain));
    assert!(!d.detect(nested));
}

#[test]
fn test_quoted_fraction_merges_overlapping_spans() {
    let patterns: Vec<regex::Regex> = super::rules::QUOTATION_PATTERNS
        .iter()
        .map(|p| regex::Regex::new(p).unwrap())
        .collect();

    let plain = r#"he said "stop now please" loudly"#;
    let nested = r#"he said "stop 'now' please" loudly"#;
    let expected = 13.0 / 25.0;

    assert!((super::rules::quoted_fraction(plain, &patterns) - expected).abs() < 1e-6);
    assert!((super::rules::quoted_fraction(nested, &patterns) - expected).abs() < 1e-6);
}

#[test]
fn test_apostrophes_are_not_quotations() {
    let d = detector();
    assert!(!d.detect("It's clear the team didn't expect the result."));
}

#[test]
fn test_attribution_phrases() {
    let d = detector();
    for text in [
        "According to Smith, the effect is small.",
        "As the committee stated, no change is needed.",
        "根据教育部的统计，入学率持续上升。",
        "正如鲁迅先生指出，希望是本无所谓有的。",
    ] {
        assert_eq!(
            d.detect_rule(text).map(CitationRule::name),
            Some("attribution_phrase"),
            "{text}"
        );
    }
}

#[test]
fn test_plain_text_is_not_citation() {
    let d = detector();
    assert!(!d.detect("Neural networks learn representations from data."));
    assert!(!d.detect(""));
}

#[test]
fn test_first_matching_rule_wins() {
    let d = detector();
    let text = r#"According to [7], "the model generalizes well beyond training data"."#;
    assert_eq!(
        d.detect_rule(text).map(CitationRule::name),
        Some("bracketed_index")
    );
}

#[test]
fn test_custom_pattern_rule_appended() {
    let d = CitationDetector::with_extra_rules(
        0.2,
        vec![CitationRule::Pattern {
            name: "ibid".to_string(),
            pattern: r"(?i)\bibid\.?".to_string(),
        }],
    )
    .expect("valid rules");

    assert_eq!(
        d.detect_rule("Ibid. p. 42 covers the same argument.")
            .map(CitationRule::name),
        Some("ibid")
    );
    assert_eq!(d.rules().count(), 5);
}

#[test]
fn test_invalid_custom_pattern_is_rejected() {
    let err = CitationDetector::new(vec![CitationRule::Pattern {
        name: "broken".to_string(),
        pattern: "(unclosed".to_string(),
    }])
    .unwrap_err();

    assert!(matches!(err, CitationError::InvalidPattern { .. }));
    assert!(err.to_string().contains("broken"));
}

#[test]
fn test_invalid_quote_fraction_is_rejected() {
    let err = CitationDetector::new(vec![CitationRule::Quotation { min_fraction: 0.0 }])
        .unwrap_err();
    assert!(matches!(err, CitationError::InvalidQuoteFraction { .. }));
}

#[test]
fn test_empty_rule_list_flags_nothing() {
    let d = CitationDetector::new(vec![]).expect("empty is valid");
    assert!(!d.detect("Results agree [1]."));
}

#[test]
fn test_citation_weights() {
    let w = CitationWeights::default();
    assert_eq!(w.weight(false, false), 1.0);
    assert_eq!(w.weight(true, false), 0.6);
    assert_eq!(w.weight(false, true), 0.6);
    assert_eq!(w.weight(true, true), 0.3);
    assert!((w.adjust(0.8, true, false) - 0.48).abs() < 1e-6);
}

#[test]
fn test_citation_weights_validate() {
    assert!(CitationWeights::default().validate().is_ok());
    let bad = CitationWeights {
        one_side: 1.5,
        ..Default::default()
    };
    assert!(matches!(
        bad.validate(),
        Err(CitationError::WeightOutOfRange {
            name: "one_side",
            ..
        })
    ));
}

#[test]
fn test_rule_serde_roundtrip_shape() {
    let json = serde_json::to_string(&CitationRule::Quotation { min_fraction: 0.25 }).unwrap();
    assert_eq!(json, r#"{"kind":"quotation","min_fraction":0.25}"#);

    let rule: CitationRule =
        serde_json::from_str(r#"{"kind":"pattern","name":"ibid","pattern":"ibid"}"#).unwrap();
    assert_eq!(rule.name(), "ibid");
}
