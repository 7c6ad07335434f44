//! Typed error taxonomy for the retrieval engine.
//!
//! Only [`RetrievalError::DimensionMismatch`] and
//! [`RetrievalError::InvalidInput`] ever reach a caller of the engine;
//! they indicate caller bugs. [`RetrievalError::ProviderUnavailable`] is an
//! environmental condition and is always absorbed into a degradation path
//! (vector → lexical, resolver tier 2 → tier 3) before the engine returns.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Two vectors of different lengths were compared. A programmer error:
    /// the embedding dimension is fixed system-wide.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The remote embedding provider or the vector index is unreachable,
    /// disabled, or timed out. Never surfaced past the merge layer.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Malformed caller input, e.g. a zero result limit.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RetrievalError {
    /// `true` for environmental failures the engine must absorb.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_))
    }
}
