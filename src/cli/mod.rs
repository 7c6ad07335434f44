pub mod add;
pub mod relate;
pub mod related;
pub mod search;
pub mod tags;

use anyhow::Result;

use crate::config::ZettelConfig;
use crate::store::SqliteStore;

/// Open the configured database as a notes store.
pub fn open_store(config: &ZettelConfig) -> Result<SqliteStore> {
    let conn = crate::db::open_database(
        config.resolved_db_path(),
        config.embedding.dimension,
    )?;
    Ok(SqliteStore::new(conn))
}

/// Truncate content to max_chars, appending "..." if truncated.
pub(crate) fn truncate_preview(content: &str, max_chars: usize) -> String {
    if content.len() <= max_chars {
        content.to_string()
    } else {
        let end = content
            .char_indices()
            .take_while(|(i, _)| *i < max_chars)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(max_chars);
        format!("{}...", &content[..end])
    }
}
