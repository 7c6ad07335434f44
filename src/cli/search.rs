use anyhow::Result;

use crate::config::ZettelConfig;
use crate::embedding::Embedder;
use crate::engine::SearchEngine;
use crate::store::NotesStore;
use crate::types::{IdeaFilters, SearchMode};

/// Run a search from the terminal and print ranked results.
#[allow(clippy::too_many_arguments)]
pub fn search(
    config: &ZettelConfig,
    query: &str,
    mode: SearchMode,
    limit: usize,
    offset: usize,
    favorite: bool,
    include_archived: bool,
    tag_names: &[String],
) -> Result<()> {
    let store = super::open_store(config)?;
    let embedder = Embedder::from_config(&config.embedding);

    let mut filters = IdeaFilters {
        archived: if include_archived { None } else { Some(false) },
        favorite: if favorite { Some(true) } else { None },
        tag_ids: Vec::new(),
    };
    for name in tag_names {
        match store.find_tag(name)? {
            Some(tag) => filters.tag_ids.push(tag.id),
            None => {
                println!("No results (unknown tag: {name}).");
                return Ok(());
            }
        }
    }

    let engine = SearchEngine::new(&store, &store, &embedder, config.retrieval.clone());
    let results = engine.search(query, mode, limit, offset, &filters)?;

    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", results.len());
    for (i, result) in results.iter().enumerate() {
        let Some(idea) = store.get_idea(result.idea_id)? else {
            continue;
        };
        println!(
            "  {}. [{}] #{} {} (score: {:.4})",
            i + 1 + offset,
            result.source,
            idea.id,
            idea.title,
            result.score,
        );
        println!("     {}", super::truncate_preview(&idea.body, 120));
        println!();
    }

    Ok(())
}
