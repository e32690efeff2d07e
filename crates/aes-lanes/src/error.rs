//! Batch-level errors.

use aes_core::CipherError;
use thiserror::Error;

/// Failures reported by [`BatchDriver`](crate::BatchDriver).
///
/// Every variant is raised before any lane starts encrypting.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A lane's key or plaintext has the wrong length.
    #[error("invalid input in lane {lane}")]
    Lane {
        /// Position of the offending pair in the batch.
        lane: usize,
        /// What was wrong with it.
        #[source]
        source: CipherError,
    },
    /// The batch does not fit the configured lane count.
    #[error("batch of {actual} pairs does not fit {expected} lanes")]
    LaneCountMismatch {
        /// Configured lane count.
        expected: usize,
        /// Number of pairs supplied.
        actual: usize,
    },
    /// The configuration asked for zero lanes.
    #[error("lane count must be at least 1")]
    InvalidLaneCount,
    /// A dedicated worker pool could not be created.
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
