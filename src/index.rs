//! Vector index: the nearest-neighbor collaborator.
//!
//! [`VectorIndex`] is the seam the vector retriever depends on. The
//! production implementation rides on the same SQLite database as the
//! notes store via sqlite-vec's `vec0` virtual table, so
//! [`SqliteStore`](crate::store::SqliteStore) implements both seams.
//! Failures are typed as [`RetrievalError::ProviderUnavailable`] so the
//! merge layer can pattern-match and degrade.

use rusqlite::params;
use tracing::debug;

use crate::db::embedding_to_bytes;
use crate::error::RetrievalError;
use crate::store::SqliteStore;

/// K-nearest-neighbor lookup over idea embeddings.
pub trait VectorIndex {
    /// The `k` nearest neighbors to `embedding`, as (idea id, distance)
    /// pairs ordered nearest-first.
    fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<(i64, f64)>, RetrievalError>;

    /// Insert or replace the vector for an idea.
    fn upsert(&self, idea_id: i64, embedding: &[f32]) -> Result<(), RetrievalError>;
}

impl VectorIndex for SqliteStore {
    fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<(i64, f64)>, RetrievalError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let run = || -> rusqlite::Result<Vec<(i64, f64)>> {
            let mut stmt = self.connection().prepare(
                "SELECT id, distance FROM ideas_vec \
                 WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![embedding_to_bytes(embedding), k as i64], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
                })?
                .collect();
            rows
        };
        run().map_err(|e| {
            debug!(error = %e, "vector index query failed");
            RetrievalError::ProviderUnavailable(e.to_string())
        })
    }

    fn upsert(&self, idea_id: i64, embedding: &[f32]) -> Result<(), RetrievalError> {
        let run = || -> rusqlite::Result<()> {
            // vec0 has no ON CONFLICT support; delete-then-insert.
            self.connection()
                .execute("DELETE FROM ideas_vec WHERE id = ?1", params![idea_id])?;
            self.connection().execute(
                "INSERT INTO ideas_vec (id, embedding) VALUES (?1, ?2)",
                params![idea_id, embedding_to_bytes(embedding)],
            )?;
            Ok(())
        };
        run().map_err(|e| RetrievalError::ProviderUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn test_store() -> SqliteStore {
        SqliteStore::new(db::open_memory_database(4).unwrap())
    }

    fn spike(dim: usize, at: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; dim];
        v[at] = 1.0;
        v
    }

    #[test]
    fn query_returns_nearest_first() {
        let store = test_store();
        store.upsert(1, &spike(4, 0)).unwrap();
        store.upsert(2, &spike(4, 2)).unwrap();

        let hits = store.query(&spike(4, 0), 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, 1);
        assert!(hits[0].1 < 0.01); // identical vector, near-zero distance
        assert!(hits[1].1 > hits[0].1);
    }

    #[test]
    fn upsert_replaces_existing_vector() {
        let store = test_store();
        store.upsert(1, &spike(4, 0)).unwrap();
        store.upsert(1, &spike(4, 3)).unwrap();

        let hits = store.query(&spike(4, 3), 1).unwrap();
        assert_eq!(hits[0].0, 1);
        assert!(hits[0].1 < 0.01);
    }

    #[test]
    fn wrong_dimension_is_provider_unavailable() {
        let store = test_store();
        store.upsert(1, &spike(4, 0)).unwrap();
        let err = store.query(&spike(8, 0), 1).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn zero_k_is_empty() {
        let store = test_store();
        assert!(store.query(&spike(4, 0), 0).unwrap().is_empty());
    }
}
