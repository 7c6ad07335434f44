//! Hybrid retrieval and ranking engine.
//!
//! [`SearchEngine`] is the entry point for both free-text search and
//! related-idea resolution. It is stateless: every operation is a function
//! of its inputs plus read-only queries against the injected collaborators
//! (notes store, vector index, embedding facade), so a single engine value
//! is safe to share across concurrent callers.
//!
//! Degradation policy: environmental failures (provider offline, index
//! unreachable, storage error) never surface to the caller; they reduce
//! search quality, not availability. Only caller bugs (dimension mismatch,
//! malformed input) propagate.

mod lexical;
mod related;
mod vector;

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::RetrievalConfig;
use crate::embedding::Embedder;
use crate::error::RetrievalError;
use crate::index::VectorIndex;
use crate::store::NotesStore;
use crate::types::{Idea, IdeaFilters, RankedResult, ResultSource, SearchMode};

/// The hybrid retrieval engine. All collaborators are injected; the engine
/// owns no state of its own beyond tuning knobs.
pub struct SearchEngine<'a> {
    store: &'a dyn NotesStore,
    index: &'a dyn VectorIndex,
    embedder: &'a Embedder,
    config: RetrievalConfig,
}

impl<'a> SearchEngine<'a> {
    pub fn new(
        store: &'a dyn NotesStore,
        index: &'a dyn VectorIndex,
        embedder: &'a Embedder,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            index,
            embedder,
            config,
        }
    }

    /// Search ideas by free-text query.
    ///
    /// A blank query returns an empty set. `vector` mode silently behaves
    /// as `lexical` when the semantic backend is disabled or unreachable.
    /// `hybrid` unions both paths: an idea found by both carries the max of
    /// the two scores (a strong exact match is never diluted by a weak
    /// semantic hit) and `source = both`. Results are sorted by score
    /// descending, then recency, then sliced by `offset`/`limit`.
    pub fn search(
        &self,
        query: &str,
        mode: SearchMode,
        limit: usize,
        offset: usize,
        filters: &IdeaFilters,
    ) -> Result<Vec<RankedResult>, RetrievalError> {
        if limit == 0 {
            return Err(RetrievalError::InvalidInput("limit must be positive".into()));
        }
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        // Filters are applied once, up front, so neither path can surface
        // an excluded idea.
        let candidates = match self.store.list_ideas(filters) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "notes store unavailable, returning empty results");
                return Ok(Vec::new());
            }
        };

        // Each retriever gets limit + offset candidates so the final slice
        // after merging has enough to draw from.
        let fetch_n = limit + offset;

        let results = match mode {
            SearchMode::Lexical => self.lexical_results(query, &candidates, fetch_n),
            SearchMode::Vector => {
                if !self.embedder.is_available() {
                    debug!("semantic backend disabled, vector search degrades to lexical");
                    self.lexical_results(query, &candidates, fetch_n)
                } else {
                    match self.vector_results(query, &candidates, fetch_n) {
                        Ok(r) => r,
                        Err(e) if e.is_unavailable() => {
                            debug!(error = %e, "vector search degrades to lexical");
                            self.lexical_results(query, &candidates, fetch_n)
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
            SearchMode::Hybrid => {
                let lex = self.lexical_results(query, &candidates, fetch_n);
                let vec = if self.embedder.is_available() {
                    match self.vector_results(query, &candidates, fetch_n) {
                        Ok(r) => r,
                        Err(e) if e.is_unavailable() => {
                            debug!(error = %e, "hybrid search degrades to lexical side only");
                            Vec::new()
                        }
                        Err(e) => return Err(e),
                    }
                } else {
                    Vec::new()
                };
                merge(lex, vec, &candidates)
            }
        };

        Ok(results.into_iter().skip(offset).take(limit).collect())
    }

    /// Ideas related to `idea_id`, resolved in three tiers: curated relation
    /// edges, then vector neighbors, then tag overlap.
    pub fn related_to(
        &self,
        idea_id: i64,
        limit: usize,
    ) -> Result<Vec<RankedResult>, RetrievalError> {
        if limit == 0 {
            return Err(RetrievalError::InvalidInput("limit must be positive".into()));
        }
        related::resolve(self.store, self.index, self.embedder, idea_id, limit)
    }

    fn lexical_results(
        &self,
        query: &str,
        candidates: &[Idea],
        fetch_n: usize,
    ) -> Vec<RankedResult> {
        let mut results = lexical::rank(query, candidates, &self.config);
        results.truncate(fetch_n);
        results
    }

    fn vector_results(
        &self,
        query: &str,
        candidates: &[Idea],
        fetch_n: usize,
    ) -> Result<Vec<RankedResult>, RetrievalError> {
        let allowed: HashSet<i64> = candidates.iter().map(|i| i.id).collect();
        let embedding = self.embedder.embed(query);
        vector::rank(self.index, &embedding, fetch_n, &allowed)
    }
}

/// Union lexical and vector hits by idea id.
///
/// An idea found by both paths keeps the maximum of the two scores and is
/// marked [`ResultSource::Both`]. The merged set sorts by score descending
/// with recency (then id) as the deterministic tie-break.
fn merge(
    lexical: Vec<RankedResult>,
    vector: Vec<RankedResult>,
    candidates: &[Idea],
) -> Vec<RankedResult> {
    let mut by_id: HashMap<i64, RankedResult> = HashMap::new();

    for r in lexical {
        by_id.insert(r.idea_id, r);
    }
    for r in vector {
        match by_id.get_mut(&r.idea_id) {
            Some(existing) => {
                existing.score = existing.score.max(r.score);
                existing.source = ResultSource::Both;
            }
            None => {
                by_id.insert(r.idea_id, r);
            }
        }
    }

    let recency: HashMap<i64, &str> = candidates
        .iter()
        .map(|i| (i.id, i.updated_at.as_str()))
        .collect();

    let mut merged: Vec<RankedResult> = by_id.into_values().collect();
    merged.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let ra = recency.get(&a.idea_id).copied().unwrap_or("");
                let rb = recency.get(&b.idea_id).copied().unwrap_or("");
                rb.cmp(ra)
            })
            .then_with(|| a.idea_id.cmp(&b.idea_id))
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea(id: i64, updated_at: &str) -> Idea {
        Idea {
            id,
            title: String::new(),
            body: String::new(),
            created_at: updated_at.into(),
            updated_at: updated_at.into(),
            archived: false,
            favorite: false,
            importance: 0,
            embedding: None,
        }
    }

    #[test]
    fn merge_takes_max_score_and_marks_both() {
        let candidates = vec![idea(1, "2026-01-01T00:00:00Z")];
        let lex = vec![RankedResult::new(1, 0.9, ResultSource::Lexical)];
        let vec = vec![RankedResult::new(1, 0.3, ResultSource::Vector)];

        let merged = merge(lex, vec, &candidates);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, ResultSource::Both);
        // Max, never an average
        assert!((merged[0].score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn merge_sorts_by_score_then_recency() {
        let candidates = vec![
            idea(1, "2026-01-01T00:00:00Z"),
            idea(2, "2026-01-05T00:00:00Z"),
            idea(3, "2026-01-03T00:00:00Z"),
        ];
        let lex = vec![
            RankedResult::new(1, 0.5, ResultSource::Lexical),
            RankedResult::new(2, 0.5, ResultSource::Lexical),
        ];
        let vec = vec![RankedResult::new(3, 0.8, ResultSource::Vector)];

        let merged = merge(lex, vec, &candidates);
        let ids: Vec<i64> = merged.iter().map(|r| r.idea_id).collect();
        // 3 wins on score; 1 and 2 tie, newer idea 2 first
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn merge_keeps_single_source_results_intact() {
        let candidates = vec![idea(1, "t"), idea(2, "t")];
        let lex = vec![RankedResult::new(1, 0.4, ResultSource::Lexical)];
        let vec = vec![RankedResult::new(2, 0.6, ResultSource::Vector)];

        let merged = merge(lex, vec, &candidates);
        assert_eq!(merged[0].source, ResultSource::Vector);
        assert_eq!(merged[1].source, ResultSource::Lexical);
    }
}
