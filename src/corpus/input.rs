//! JSON corpus documents read by the `overlap` binary.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::embedding::PrecomputedOracle;

use super::types::SegmentRecord;

/// A segment record with an optional inline vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSegment {
    #[serde(flatten)]
    pub record: SegmentRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

/// `{"segments": [...], "vectors": {"<text>": [...]}}`.
///
/// Vectors may be given inline per segment, in the `vectors` map keyed by text,
/// or not at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusFile {
    pub segments: Vec<CorpusSegment>,
    #[serde(default)]
    pub vectors: HashMap<String, Vec<f32>>,
}

impl CorpusFile {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether any precomputed vector is present.
    pub fn has_vectors(&self) -> bool {
        !self.vectors.is_empty() || self.segments.iter().any(|s| s.embedding.is_some())
    }

    /// Splits the document into records and an oracle serving its vectors.
    ///
    /// Vectors are keyed by text. Inline vectors win over the `vectors` map for
    /// the same text; among inline vectors for one text the last one wins, and a
    /// conflicting one is logged.
    pub fn into_parts(self) -> (Vec<SegmentRecord>, PrecomputedOracle) {
        let mut oracle = PrecomputedOracle::new();
        for (text, vector) in self.vectors {
            oracle.insert(&text, vector);
        }

        let mut inline_texts: HashSet<String> = HashSet::new();
        let records = self
            .segments
            .into_iter()
            .map(|segment| {
                if let Some(vector) = segment.embedding {
                    let previous = oracle.insert(&segment.record.text, vector.clone());
                    let seen = !inline_texts.insert(segment.record.text.clone());
                    if seen && previous.is_some_and(|p| p != vector) {
                        warn!(
                            submission = %segment.record.submission_id,
                            document = %segment.record.document_id,
                            index = segment.record.index,
                            "Conflicting inline vectors for identical text; keeping the last one"
                        );
                    }
                }
                segment.record
            })
            .collect();

        (records, oracle)
    }
}
