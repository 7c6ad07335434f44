#![allow(dead_code)]

use anyhow::Result;
use rusqlite::params;

use zettel::db;
use zettel::embedding::{fallback_embedding, Embedder, EmbeddingBackend};
use zettel::error::RetrievalError;
use zettel::index::VectorIndex;
use zettel::store::{NotesStore, SqliteStore};
use zettel::types::{Idea, IdeaFilters, RelationEdge, Tag};

/// Embedding dimension used across integration tests. Small on purpose.
pub const DIM: usize = 8;

/// Open a fresh in-memory store with schema applied.
pub fn test_store() -> SqliteStore {
    SqliteStore::new(db::open_memory_database(DIM).unwrap())
}

/// Deterministic embedding with a spike at position `seed`.
/// Each seed produces a distinct, orthogonal vector.
pub fn spike(seed: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    v[seed % DIM] = 1.0;
    v
}

/// Insert an idea, index its bag-of-words embedding, and return its id.
pub fn insert_idea(store: &SqliteStore, title: &str, body: &str) -> i64 {
    let id = store.create_idea(title, body, false, 0).unwrap();
    let idea = store.get_idea(id).unwrap().unwrap();
    let embedding = fallback_embedding(&idea.embeddable_text(), DIM);
    store.upsert(id, &embedding).unwrap();
    store.cache_embedding(id, &embedding).unwrap();
    id
}

/// Insert an idea with an explicit embedding vector.
pub fn insert_idea_with_embedding(
    store: &SqliteStore,
    title: &str,
    body: &str,
    embedding: &[f32],
) -> i64 {
    let id = store.create_idea(title, body, false, 0).unwrap();
    store.upsert(id, embedding).unwrap();
    store.cache_embedding(id, embedding).unwrap();
    id
}

/// Pin an idea's recency so tie-breaking is deterministic.
pub fn set_updated_at(store: &SqliteStore, id: i64, timestamp: &str) {
    store
        .connection()
        .execute(
            "UPDATE ideas SET updated_at = ?1 WHERE id = ?2",
            params![timestamp, id],
        )
        .unwrap();
}

/// An embedder whose "remote" backend is the deterministic bag-of-words
/// vectorizer, so it reads as available yet stays reproducible and
/// comparable with the vectors `insert_idea` puts into the index.
pub fn bag_embedder() -> Embedder {
    Embedder::with_backend(Box::new(BagBackend), DIM)
}

struct BagBackend;

impl EmbeddingBackend for BagBackend {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        Ok(fallback_embedding(text, DIM))
    }
}

/// Vector index that is always unreachable.
pub struct DownIndex;

impl VectorIndex for DownIndex {
    fn query(&self, _e: &[f32], _k: usize) -> Result<Vec<(i64, f64)>, RetrievalError> {
        Err(RetrievalError::ProviderUnavailable("index offline".into()))
    }

    fn upsert(&self, _id: i64, _e: &[f32]) -> Result<(), RetrievalError> {
        Err(RetrievalError::ProviderUnavailable("index offline".into()))
    }
}

/// Vector index that fails the test if touched at all.
pub struct PanicIndex;

impl VectorIndex for PanicIndex {
    fn query(&self, _e: &[f32], _k: usize) -> Result<Vec<(i64, f64)>, RetrievalError> {
        panic!("vector index must not be queried");
    }

    fn upsert(&self, _id: i64, _e: &[f32]) -> Result<(), RetrievalError> {
        panic!("vector index must not be written");
    }
}

/// Notes store whose every read fails, simulating a broken database.
pub struct BrokenStore;

impl NotesStore for BrokenStore {
    fn get_idea(&self, _id: i64) -> Result<Option<Idea>> {
        anyhow::bail!("database is locked")
    }

    fn list_ideas(&self, _filters: &IdeaFilters) -> Result<Vec<Idea>> {
        anyhow::bail!("database is locked")
    }

    fn list_tags(&self, _idea_id: i64) -> Result<Vec<Tag>> {
        anyhow::bail!("database is locked")
    }

    fn list_relations(&self, _source_id: i64) -> Result<Vec<RelationEdge>> {
        anyhow::bail!("database is locked")
    }

    fn cache_embedding(&self, _idea_id: i64, _embedding: &[f32]) -> Result<()> {
        anyhow::bail!("database is locked")
    }
}
