use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DimConfig, DimValidationError, validate_embedding_dim};
use crate::corpus::{Granularity, Segment};

use super::error::IndexError;
use super::flat::{Exclusion, FlatIndex, Neighbor};

/// How segments of one granularity are split into indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPartitioning {
    /// One index per language; queries stay inside their own language.
    #[default]
    PerLanguage,
    /// One index for every language.
    Shared,
}

impl IndexPartitioning {
    pub fn from_cross_language(cross_language: bool) -> Self {
        if cross_language {
            Self::Shared
        } else {
            Self::PerLanguage
        }
    }

    fn key(&self, language: &str) -> Option<String> {
        match self {
            Self::PerLanguage => Some(language.to_string()),
            Self::Shared => None,
        }
    }
}

/// All partitions of one granularity.
#[derive(Debug, Clone)]
pub struct GranularityIndex {
    granularity: Granularity,
    partitioning: IndexPartitioning,
    dim: Option<usize>,
    partitions: BTreeMap<Option<String>, FlatIndex>,
}

impl GranularityIndex {
    /// Builds the partitions for `segments`, skipping segments without a vector.
    ///
    /// `vectors[id]` must line up with `segments[id]`. Every vector must have the
    /// same dimension (the pinned one in `dims`, or else the first vector's).
    pub fn build(
        granularity: Granularity,
        segments: &[Segment],
        vectors: &[Option<Vec<f32>>],
        partitioning: IndexPartitioning,
        dims: DimConfig,
    ) -> Result<Self, IndexError> {
        if segments.len() != vectors.len() {
            return Err(IndexError::LengthMismatch {
                granularity,
                segments: segments.len(),
                vectors: vectors.len(),
            });
        }

        let mut dim: Option<usize> = None;
        let mut grouped: BTreeMap<Option<String>, Vec<(&Segment, &[f32])>> = BTreeMap::new();

        for (segment, vector) in segments.iter().zip(vectors) {
            let Some(vector) = vector.as_deref() else {
                continue;
            };

            let checked = match dim {
                Some(expected) => validate_embedding_dim(vector.len(), expected),
                None => dims.check(vector.len()),
            };
            checked.map_err(|err| match err {
                DimValidationError::ZeroDimension => IndexError::ZeroDimension {
                    segment: segment.id,
                },
                DimValidationError::DimensionMismatch { expected, actual } => {
                    IndexError::DimensionMismatch {
                        expected,
                        actual,
                        segment: segment.id,
                    }
                }
            })?;
            dim.get_or_insert(vector.len());

            if let Some(position) = vector.iter().position(|x| !x.is_finite()) {
                return Err(IndexError::NonFiniteComponent {
                    segment: segment.id,
                    position,
                });
            }

            grouped
                .entry(partitioning.key(&segment.language))
                .or_default()
                .push((segment, vector));
        }

        let dim = dim.or(dims.embedding_dim);
        let width = dim.unwrap_or(0);
        let partitions: BTreeMap<Option<String>, FlatIndex> = grouped
            .into_iter()
            .map(|(key, rows)| {
                let index = FlatIndex::build(
                    width,
                    rows.into_iter()
                        .map(|(segment, vector)| (segment.id, segment.submission_ordinal, vector)),
                );
                (key, index)
            })
            .collect();

        debug!(
            %granularity,
            ?partitioning,
            partitions = partitions.len(),
            rows = partitions.values().map(FlatIndex::len).sum::<usize>(),
            dim = width,
            "Index built"
        );

        Ok(Self {
            granularity,
            partitioning,
            dim,
            partitions,
        })
    }

    /// Neighbors of `segment` (whose vector is `vector`) in its partition.
    ///
    /// Never returns `segment` itself or any segment of the same submission.
    pub fn neighbors(
        &self,
        segment: &Segment,
        vector: &[f32],
        k: usize,
        min_similarity: f32,
    ) -> Vec<Neighbor> {
        let key = self.partitioning.key(&segment.language);
        match self.partitions.get(&key) {
            Some(index) => index.query_excluding(
                vector,
                k,
                min_similarity,
                Exclusion {
                    segment: Some(segment.id),
                    owner: Some(segment.submission_ordinal),
                },
            ),
            None => Vec::new(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn partitioning(&self) -> IndexPartitioning {
        self.partitioning
    }

    /// Common vector dimension, or `None` when no vector was indexed.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Indexed rows across all partitions.
    pub fn len(&self) -> usize {
        self.partitions.values().map(FlatIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
