use std::cmp::Ordering;

use crate::corpus::SegmentId;

/// One query result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: SegmentId,
    /// Cosine similarity, clamped into `[0, 1]`.
    pub similarity: f32,
}

/// Rows a query must not return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exclusion {
    /// The queried segment itself.
    pub segment: Option<SegmentId>,
    /// Every row owned by this submission ordinal.
    pub owner: Option<u32>,
}

impl Exclusion {
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    fn excludes(&self, id: SegmentId, owner: u32) -> bool {
        self.segment == Some(id) || self.owner == Some(owner)
    }
}

/// Exhaustive inner-product index over L2-normalized rows.
///
/// Rows are stored contiguously (`dim` floats each) and never change after
/// [`FlatIndex::build`]. Queries take `&self`, so one index serves any number of
/// concurrent readers.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    dim: usize,
    ids: Vec<SegmentId>,
    owners: Vec<u32>,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Builds an index from `(segment, owner, vector)` rows.
    ///
    /// Callers validate dimensions first; rows shorter or longer than `dim`
    /// would corrupt the layout.
    pub(crate) fn build<'a>(
        dim: usize,
        rows: impl IntoIterator<Item = (SegmentId, u32, &'a [f32])>,
    ) -> Self {
        let mut index = Self {
            dim,
            ..Self::default()
        };
        for (id, owner, vector) in rows {
            debug_assert_eq!(vector.len(), dim);
            index.ids.push(id);
            index.owners.push(owner);
            index.data.extend_from_slice(vector);
        }
        index
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Top-`k` rows with similarity `>= min_similarity`, best first.
    pub fn query(&self, vector: &[f32], k: usize, min_similarity: f32) -> Vec<Neighbor> {
        self.query_excluding(vector, k, min_similarity, Exclusion::none())
    }

    /// Like [`query`](Self::query), skipping excluded rows during the scan.
    ///
    /// Ties are broken by segment id ascending.
    pub fn query_excluding(
        &self,
        vector: &[f32],
        k: usize,
        min_similarity: f32,
        exclusion: Exclusion,
    ) -> Vec<Neighbor> {
        if k == 0 || self.is_empty() || vector.len() != self.dim {
            return Vec::new();
        }

        let mut results: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dim)
            .zip(self.ids.iter().zip(&self.owners))
            .filter(|(_, (id, owner))| !exclusion.excludes(**id, **owner))
            .filter_map(|(row, (id, _))| {
                let similarity = dot(vector, row).clamp(0.0, 1.0);
                (similarity >= min_similarity).then_some(Neighbor {
                    id: *id,
                    similarity,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        results.truncate(k);
        results
    }
}

#[inline]
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
