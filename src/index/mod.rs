//! Per-granularity nearest-neighbor indices.
//!
//! [`GranularityIndex`] groups segments into partitions according to
//! [`IndexPartitioning`] and answers top-k cosine queries over L2-normalized
//! vectors. Each partition is an exhaustive [`FlatIndex`] scan; batches are
//! small enough that an approximate index would only cost recall.

mod error;
pub mod flat;
pub mod partition;


pub use error::IndexError;
pub use flat::{Exclusion, FlatIndex, Neighbor};
pub use partition::{GranularityIndex, IndexPartitioning};
