//! End-to-end search behavior over a real SQLite store and vec index.

mod helpers;

use helpers::*;
use rusqlite::params;
use zettel::config::RetrievalConfig;
use zettel::embedding::Embedder;
use zettel::engine::SearchEngine;
use zettel::error::RetrievalError;
use zettel::types::{IdeaFilters, ResultSource, SearchMode};

#[test]
fn lexical_search_scores_and_excludes_non_matches() {
    let store = test_store();
    let rust = insert_idea(&store, "Rust", "ownership model");
    let _go = insert_idea(&store, "Go", "goroutines");

    let embedder = Embedder::disabled(DIM);
    let engine = SearchEngine::new(&store, &store, &embedder, RetrievalConfig::default());

    let results = engine
        .search("model", SearchMode::Lexical, 10, 0, &IdeaFilters::default())
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].idea_id, rust);
    assert!((results[0].score - 0.1).abs() < 1e-9);
    assert_eq!(results[0].source, ResultSource::Lexical);
}

#[test]
fn hybrid_merges_with_max_score_and_both_source() {
    let store = test_store();
    // Found by both paths: exact lexical match and identical token bag
    let both = insert_idea(&store, "alpha beta", "alpha beta");
    // Vector only: same tokens, different order defeats substring matching
    let vector_only = insert_idea(&store, "", "beta alpha");
    // Both paths again, but the lexical side is stronger than the
    // cross-vocabulary vector score
    let weak = insert_idea(&store, "alpha beta notes", "nothing else");
    set_updated_at(&store, both, "2026-03-03T00:00:00Z");
    set_updated_at(&store, vector_only, "2026-03-01T00:00:00Z");
    set_updated_at(&store, weak, "2026-03-02T00:00:00Z");

    let embedder = bag_embedder();
    let engine = SearchEngine::new(&store, &store, &embedder, RetrievalConfig::default());

    let results = engine
        .search("alpha beta", SearchMode::Hybrid, 10, 0, &IdeaFilters::default())
        .unwrap();

    assert_eq!(results.len(), 3);
    for r in &results {
        assert!((0.0..=1.0).contains(&r.score), "score out of range: {}", r.score);
    }

    // Score ties at 1.0 break by recency: `both` is newer than `vector_only`
    assert_eq!(results[0].idea_id, both);
    assert_eq!(results[0].source, ResultSource::Both);
    // Max of (0.6 lexical, 1.0 vector), never an average
    assert!((results[0].score - 1.0).abs() < 1e-6);

    assert_eq!(results[1].idea_id, vector_only);
    assert_eq!(results[1].source, ResultSource::Vector);

    assert_eq!(results[2].idea_id, weak);
    assert_eq!(results[2].source, ResultSource::Both);
    // Lexical 0.5 beats the weak cross-vocabulary vector hit
    assert!((results[2].score - 0.5).abs() < 1e-6);
}

#[test]
fn pagination_slices_after_merge() {
    let store = test_store();
    // Bodies with 5..1 occurrences give scores 0.5..0.1
    let mut ids = Vec::new();
    for n in (1..=5).rev() {
        let body = "pag ".repeat(n);
        ids.push(insert_idea(&store, "", body.trim()));
    }

    let embedder = Embedder::disabled(DIM);
    let engine = SearchEngine::new(&store, &store, &embedder, RetrievalConfig::default());

    let page = engine
        .search("pag", SearchMode::Hybrid, 2, 2, &IdeaFilters::default())
        .unwrap();

    // Ranks 2 and 3 (0-indexed) of the merged, score-sorted list
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].idea_id, ids[2]);
    assert!((page[0].score - 0.3).abs() < 1e-9);
    assert_eq!(page[1].idea_id, ids[3]);
    assert!((page[1].score - 0.2).abs() < 1e-9);
}

#[test]
fn filters_exclude_ideas_from_both_paths() {
    let store = test_store();
    let archived = insert_idea(&store, "alpha beta", "alpha beta");
    let live = insert_idea(&store, "alpha beta", "alpha beta");
    store
        .connection()
        .execute("UPDATE ideas SET archived = 1 WHERE id = ?1", params![archived])
        .unwrap();

    let embedder = bag_embedder();
    let engine = SearchEngine::new(&store, &store, &embedder, RetrievalConfig::default());

    let filters = IdeaFilters {
        archived: Some(false),
        ..IdeaFilters::default()
    };
    for mode in [SearchMode::Lexical, SearchMode::Vector, SearchMode::Hybrid] {
        let results = engine.search("alpha beta", mode, 10, 0, &filters).unwrap();
        let ids: Vec<i64> = results.iter().map(|r| r.idea_id).collect();
        assert_eq!(ids, vec![live], "mode {mode} leaked a filtered idea");
    }
}

#[test]
fn tag_filter_applies_to_vector_path() {
    let store = test_store();
    let tagged = insert_idea(&store, "", "alpha beta");
    let untagged = insert_idea(&store, "", "alpha beta");
    let tag_id = store.tag_idea(tagged, "rust").unwrap();

    let embedder = bag_embedder();
    let engine = SearchEngine::new(&store, &store, &embedder, RetrievalConfig::default());

    let filters = IdeaFilters {
        tag_ids: vec![tag_id],
        ..IdeaFilters::default()
    };
    let results = engine
        .search("alpha beta", SearchMode::Vector, 10, 0, &filters)
        .unwrap();
    let ids: Vec<i64> = results.iter().map(|r| r.idea_id).collect();
    assert!(ids.contains(&tagged));
    assert!(!ids.contains(&untagged));
}

#[test]
fn blank_query_returns_empty_set() {
    let store = test_store();
    insert_idea(&store, "Rust", "ownership model");

    let embedder = bag_embedder();
    let engine = SearchEngine::new(&store, &store, &embedder, RetrievalConfig::default());

    for mode in [SearchMode::Lexical, SearchMode::Vector, SearchMode::Hybrid] {
        assert!(engine
            .search("   ", mode, 10, 0, &IdeaFilters::default())
            .unwrap()
            .is_empty());
    }
}

#[test]
fn zero_limit_is_invalid_input() {
    let store = test_store();
    let embedder = Embedder::disabled(DIM);
    let engine = SearchEngine::new(&store, &store, &embedder, RetrievalConfig::default());

    let err = engine
        .search("model", SearchMode::Lexical, 0, 0, &IdeaFilters::default())
        .unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidInput(_)));
}

#[test]
fn vector_mode_ranks_by_similarity_only() {
    let store = test_store();
    let close = insert_idea_with_embedding(&store, "close", "body", &spike(0));
    let far = insert_idea_with_embedding(&store, "far", "body", &spike(1));

    struct Fixed(Vec<f32>);
    impl zettel::embedding::EmbeddingBackend for Fixed {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, RetrievalError> {
            Ok(self.0.clone())
        }
    }

    // Query embedding equals `close`'s vector
    let embedder = Embedder::with_backend(Box::new(Fixed(spike(0))), DIM);
    let engine = SearchEngine::new(&store, &store, &embedder, RetrievalConfig::default());

    let results = engine
        .search("anything", SearchMode::Vector, 10, 0, &IdeaFilters::default())
        .unwrap();

    assert_eq!(results[0].idea_id, close);
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert_eq!(results[1].idea_id, far);
    assert!(results[1].score < results[0].score);
    assert!(results.iter().all(|r| r.source == ResultSource::Vector));
}
