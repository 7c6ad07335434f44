use anyhow::Result;

use crate::config::ZettelConfig;
use crate::embedding::Embedder;
use crate::engine::SearchEngine;
use crate::store::NotesStore;

/// Print the ideas related to one idea, across all resolution tiers.
pub fn related(config: &ZettelConfig, idea_id: i64, limit: usize) -> Result<()> {
    let store = super::open_store(config)?;
    let embedder = Embedder::from_config(&config.embedding);
    let engine = SearchEngine::new(&store, &store, &embedder, config.retrieval.clone());

    let results = engine.related_to(idea_id, limit)?;
    if results.is_empty() {
        println!("No related ideas found for #{idea_id}.");
        return Ok(());
    }

    println!("Related to #{idea_id}:\n");
    for result in &results {
        let Some(idea) = store.get_idea(result.idea_id)? else {
            continue;
        };
        println!(
            "  [{}] #{} {} (score: {:.4})",
            result.source, idea.id, idea.title, result.score
        );
        println!("     {}", super::truncate_preview(&idea.body, 100));
    }

    Ok(())
}
