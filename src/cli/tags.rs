use anyhow::{bail, Result};

use crate::config::ZettelConfig;
use crate::store::NotesStore;

/// Attach tags to an existing idea, creating tag rows as needed.
pub fn attach(config: &ZettelConfig, idea_id: i64, names: &[String]) -> Result<()> {
    let store = super::open_store(config)?;
    if store.get_idea(idea_id)?.is_none() {
        bail!("idea not found: {idea_id}");
    }
    for name in names {
        store.tag_idea(idea_id, name)?;
    }
    println!("Tagged #{idea_id}: {}", names.join(", "));
    Ok(())
}

/// Suggest tags whose name contains the query.
pub fn suggest(config: &ZettelConfig, query: &str, limit: usize) -> Result<()> {
    let store = super::open_store(config)?;
    let tags = store.suggest_tags(query, limit)?;

    if tags.is_empty() {
        println!("No matching tags.");
        return Ok(());
    }
    for tag in tags {
        println!("  #{} {}", tag.id, tag.name);
    }
    Ok(())
}
