use anyhow::Result;

use crate::config::ZettelConfig;
use crate::embedding::Embedder;
use crate::index::VectorIndex;
use crate::store::NotesStore;

/// Capture a new idea: store it, tag it, and index its embedding.
pub fn add(
    config: &ZettelConfig,
    title: &str,
    body: &str,
    tags: &[String],
    favorite: bool,
    importance: i64,
) -> Result<()> {
    let store = super::open_store(config)?;
    let embedder = Embedder::from_config(&config.embedding);

    let id = store.create_idea(title, body, favorite, importance)?;
    for tag in tags {
        store.tag_idea(id, tag)?;
    }

    // Index the embedding now so the idea is immediately searchable. The
    // remote provider may be offline; the fallback vector still goes in.
    let text = store
        .get_idea(id)?
        .map(|i| i.embeddable_text())
        .unwrap_or_else(|| body.to_string());
    let embedding = embedder.embed(&text);
    store.upsert(id, &embedding)?;
    store.cache_embedding(id, &embedding)?;

    println!("Saved idea {id}: {title}");
    if !tags.is_empty() {
        println!("  tags: {}", tags.join(", "));
    }
    Ok(())
}
