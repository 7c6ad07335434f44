//! Lexical retriever: case-insensitive substring scoring over title/body.

use crate::config::RetrievalConfig;
use crate::types::{Idea, RankedResult, ResultSource};

/// Score every candidate against the query and return the non-zero hits,
/// best first.
///
/// The score is `body_occurrences * body_weight + title_occurrences *
/// title_weight`, clamped to `[0, 1]`. Matching is plain substring counting,
/// not word-boundary aware, so a query repeated inside one word counts each
/// occurrence. Ties break by `updated_at` descending, then id, so the
/// ordering is stable for identical inputs.
pub(crate) fn rank(
    query: &str,
    candidates: &[Idea],
    config: &RetrievalConfig,
) -> Vec<RankedResult> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&Idea, f64)> = Vec::new();
    for idea in candidates {
        let body_count = occurrences(&idea.body, &needle);
        let title_count = occurrences(&idea.title, &needle);
        let score = body_count as f64 * config.body_weight
            + title_count as f64 * config.title_weight;
        if score > 0.0 {
            scored.push((idea, score.min(1.0)));
        }
    }

    scored.sort_by(|(a, sa), (b, sb)| {
        sb.partial_cmp(sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    scored
        .into_iter()
        .map(|(idea, score)| RankedResult::new(idea.id, score, ResultSource::Lexical))
        .collect()
}

/// Non-overlapping, case-insensitive occurrence count.
fn occurrences(haystack: &str, needle_lower: &str) -> usize {
    haystack.to_lowercase().matches(needle_lower).count()
}
