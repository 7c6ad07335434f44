//! Vector retriever: nearest-neighbor lookup with distance-to-similarity
//! conversion and candidate filtering.

use std::collections::HashSet;

use crate::error::RetrievalError;
use crate::index::VectorIndex;
use crate::similarity::distance_to_similarity;
use crate::types::{RankedResult, ResultSource};

/// Query the index for the `k` nearest neighbors and keep those in the
/// filtered candidate set, nearest first.
///
/// Index failures propagate as typed errors; the merge layer owns the
/// decision to degrade to lexical-only search.
pub(crate) fn rank(
    index: &dyn VectorIndex,
    query_embedding: &[f32],
    k: usize,
    allowed: &HashSet<i64>,
) -> Result<Vec<RankedResult>, RetrievalError> {
    let neighbors = index.query(query_embedding, k)?;
    Ok(neighbors
        .into_iter()
        .filter(|(id, _)| allowed.contains(id))
        .map(|(id, distance)| {
            RankedResult::new(id, distance_to_similarity(distance), ResultSource::Vector)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-response fake index.
    struct StaticIndex(Vec<(i64, f64)>);

    impl VectorIndex for StaticIndex {
        fn query(&self, _e: &[f32], k: usize) -> Result<Vec<(i64, f64)>, RetrievalError> {
            Ok(self.0.iter().take(k).cloned().collect())
        }

        fn upsert(&self, _id: i64, _e: &[f32]) -> Result<(), RetrievalError> {
            Ok(())
        }
    }

    /// Always-failing fake index.
    struct DownIndex;

    impl VectorIndex for DownIndex {
        fn query(&self, _e: &[f32], _k: usize) -> Result<Vec<(i64, f64)>, RetrievalError> {
            Err(RetrievalError::ProviderUnavailable("index offline".into()))
        }

        fn upsert(&self, _id: i64, _e: &[f32]) -> Result<(), RetrievalError> {
            Err(RetrievalError::ProviderUnavailable("index offline".into()))
        }
    }

    #[test]
    fn distances_become_similarities() {
        let index = StaticIndex(vec![(1, 0.0), (2, 0.4), (3, 1.6)]);
        let allowed: HashSet<i64> = [1, 2, 3].into();
        let results = rank(&index, &[0.0; 4], 3, &allowed).unwrap();
        assert_eq!(results[0].idea_id, 1);
        assert_eq!(results[0].score, 1.0);
        assert!((results[1].score - 0.6).abs() < 1e-9);
        // Distance above 1 floors at zero rather than going negative
        assert_eq!(results[2].score, 0.0);
    }

    #[test]
    fn filtered_out_ideas_never_surface() {
        let index = StaticIndex(vec![(1, 0.1), (2, 0.2)]);
        let allowed: HashSet<i64> = [2].into();
        let results = rank(&index, &[0.0; 4], 5, &allowed).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].idea_id, 2);
    }

    #[test]
    fn index_failure_propagates_as_typed_error() {
        let allowed: HashSet<i64> = HashSet::new();
        let err = rank(&DownIndex, &[0.0; 4], 5, &allowed).unwrap_err();
        assert!(err.is_unavailable());
    }
}
