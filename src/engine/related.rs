//! Related-idea resolution: curated edges, then vector neighbors, then tag
//! overlap, with an exclusion set threaded through all three tiers so no
//! idea (including the source) is ever returned twice.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::embedding::Embedder;
use crate::error::RetrievalError;
use crate::index::VectorIndex;
use crate::similarity::distance_to_similarity;
use crate::store::NotesStore;
use crate::types::{Idea, IdeaFilters, RankedResult, ResultSource};

/// Resolve up to `limit` ideas related to `idea_id`.
///
/// Tier 1 (curated relations) fills from confidence-ordered edges and
/// returns immediately when it alone satisfies the limit. Tier 2 (vector
/// neighbors) runs only when the semantic backend is available; any failure
/// skips straight to tier 3. Tier 3 (tag overlap) ranks by shared-tag count
/// then recency. An unknown `idea_id` resolves to an empty set.
pub(crate) fn resolve(
    store: &dyn NotesStore,
    index: &dyn VectorIndex,
    embedder: &Embedder,
    idea_id: i64,
    limit: usize,
) -> Result<Vec<RankedResult>, RetrievalError> {
    let idea = match store.get_idea(idea_id) {
        Ok(Some(idea)) => idea,
        Ok(None) => return Ok(Vec::new()),
        Err(e) => {
            warn!(error = %e, idea_id, "notes store unavailable, no related ideas");
            return Ok(Vec::new());
        }
    };

    let mut seen: HashSet<i64> = HashSet::from([idea_id]);
    let mut results: Vec<RankedResult> = Vec::new();

    // Tier 1: curated relation edges, confidence descending.
    match store.list_relations(idea_id) {
        Ok(edges) => {
            for edge in edges {
                if results.len() >= limit {
                    break;
                }
                if seen.insert(edge.target_id) {
                    results.push(RankedResult::new(
                        edge.target_id,
                        edge.confidence,
                        ResultSource::Relation,
                    ));
                }
            }
        }
        Err(e) => warn!(error = %e, idea_id, "failed to read relation edges"),
    }
    if results.len() >= limit {
        return Ok(results);
    }

    // Tier 2: vector neighbors, only when the backend is reachable.
    if embedder.is_available() {
        match vector_tier(store, index, embedder, &idea, limit - results.len(), &mut seen) {
            Ok(mut tier) => results.append(&mut tier),
            Err(e) => debug!(error = %e, idea_id, "vector tier skipped"),
        }
    }
    if results.len() >= limit {
        return Ok(results);
    }

    // Tier 3: tag overlap.
    let mut tier = tag_overlap_tier(store, idea_id, limit - results.len(), &mut seen);
    results.append(&mut tier);

    Ok(results)
}

/// Nearest neighbors of the idea's own embedding. Over-fetches one slot to
/// account for the idea itself appearing in its own neighborhood.
fn vector_tier(
    store: &dyn NotesStore,
    index: &dyn VectorIndex,
    embedder: &Embedder,
    idea: &Idea,
    remaining: usize,
    seen: &mut HashSet<i64>,
) -> Result<Vec<RankedResult>, RetrievalError> {
    let embedding = match &idea.embedding {
        Some(e) => e.clone(),
        None => {
            let e = embedder.embed(&idea.embeddable_text());
            // Persist for next time; the resolution must not fail if the
            // write does.
            if let Err(err) = store.cache_embedding(idea.id, &e) {
                debug!(error = %err, idea_id = idea.id, "embedding cache write failed");
            }
            e
        }
    };

    let neighbors = index.query(&embedding, remaining + 1)?;
    let mut tier = Vec::new();
    for (id, distance) in neighbors {
        if tier.len() >= remaining {
            break;
        }
        if seen.insert(id) {
            tier.push(RankedResult::new(
                id,
                distance_to_similarity(distance),
                ResultSource::Vector,
            ));
        }
    }
    Ok(tier)
}

/// Ideas sharing at least one tag with the source, ranked by shared-tag
/// count descending then recency. Scores are the shared fraction of the
/// source idea's tags.
fn tag_overlap_tier(
    store: &dyn NotesStore,
    idea_id: i64,
    remaining: usize,
    seen: &mut HashSet<i64>,
) -> Vec<RankedResult> {
    let source_tags = match store.list_tags(idea_id) {
        Ok(tags) if !tags.is_empty() => tags,
        Ok(_) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, idea_id, "failed to read tags");
            return Vec::new();
        }
    };
    let source_ids: HashSet<i64> = source_tags.iter().map(|t| t.id).collect();

    let candidates = match store.list_ideas(&IdeaFilters {
        tag_ids: source_tags.iter().map(|t| t.id).collect(),
        ..IdeaFilters::default()
    }) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, idea_id, "failed to list tag-overlapping ideas");
            return Vec::new();
        }
    };

    let mut scored: Vec<(usize, Idea)> = Vec::new();
    for candidate in candidates {
        if seen.contains(&candidate.id) {
            continue;
        }
        let shared = match store.list_tags(candidate.id) {
            Ok(tags) => tags.iter().filter(|t| source_ids.contains(&t.id)).count(),
            Err(_) => 0,
        };
        if shared > 0 {
            scored.push((shared, candidate));
        }
    }

    scored.sort_by(|(sa, a), (sb, b)| {
        sb.cmp(sa)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let total = source_ids.len();
    scored
        .into_iter()
        .take(remaining)
        .map(|(shared, candidate)| {
            seen.insert(candidate.id);
            RankedResult::new(
                candidate.id,
                shared as f64 / total as f64,
                ResultSource::TagOverlap,
            )
        })
        .collect()
}
