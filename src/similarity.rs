//! Pure vector-similarity helpers shared by the embedding facade and the
//! vector retriever.

use crate::error::RetrievalError;

/// Cosine similarity between two equal-length vectors, in `[-1.0, 1.0]`.
///
/// Fails with [`RetrievalError::DimensionMismatch`] when the lengths differ.
/// Returns `0.0` when either vector has zero norm rather than dividing by
/// zero.
#[allow(dead_code)]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, RetrievalError> {
    if a.len() != b.len() {
        return Err(RetrievalError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Convert an index-reported distance into a similarity score.
///
/// Indexes that report distances above 1 floor the similarity at 0 rather
/// than going negative.
pub fn distance_to_similarity(distance: f64) -> f64 {
    (1.0 - distance).max(0.0)
}

/// Right-pad with zeros or truncate so the vector has exactly `dim` entries.
pub fn pad_or_truncate(mut v: Vec<f32>, dim: usize) -> Vec<f32> {
    v.resize(dim, 0.0);
    v
}
