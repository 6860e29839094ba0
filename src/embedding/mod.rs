//! Embedding oracle seam.
//!
//! The model that turns text into vectors is an external collaborator. The
//! engine only sees [`EmbeddingOracle`] and schedules calls to it with
//! [`embed_segments`], according to the configured [`ExecutionMode`].
//!
//! - [`HashOracle`] is a deterministic stub (exact copies only).
//! - [`PrecomputedOracle`] serves vectors computed elsewhere.
//! - `MockOracle` (tests / `mock` feature) scripts vectors and failures.

pub mod config;
mod error;
pub mod hash;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod precomputed;
pub mod scheduler;


pub use config::ExecutionMode;
pub use error::EmbeddingError;
pub use hash::HashOracle;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockOracle;
pub use precomputed::PrecomputedOracle;
pub use scheduler::{EmbeddingBatch, embed_segments, normalize};

/// Maps a segment's text to a fixed-dimension vector.
///
/// Implementations must be safe to call from several threads at once; the CPU
/// execution mode does exactly that. Returned vectors are normalized again by
/// the scheduler, so implementations may return unnormalized output.
pub trait EmbeddingOracle: Send + Sync {
    fn embed(&self, text: &str, language_hint: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "oracle"
    }
}
