//! SQL DDL for all Zettel tables.
//!
//! Defines the `ideas`, `tags`, `idea_tags`, `relations`, and `ideas_vec`
//! (vec0) tables. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization. The vec0 table dimension comes from config, so it is
//! built separately from the static DDL.

use rusqlite::Connection;

/// All schema DDL statements for Zettel's core tables.
const SCHEMA_SQL: &str = r#"
-- Idea notes
CREATE TABLE IF NOT EXISTS ideas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    archived INTEGER NOT NULL DEFAULT 0,
    favorite INTEGER NOT NULL DEFAULT 0,
    importance INTEGER NOT NULL DEFAULT 0,
    embedding BLOB
);

CREATE INDEX IF NOT EXISTS idx_ideas_updated ON ideas(updated_at);
CREATE INDEX IF NOT EXISTS idx_ideas_archived ON ideas(archived);
CREATE INDEX IF NOT EXISTS idx_ideas_favorite ON ideas(favorite);

-- Tags, unique by name
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS idea_tags (
    idea_id INTEGER NOT NULL REFERENCES ideas(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (idea_id, tag_id)
);

CREATE INDEX IF NOT EXISTS idx_idea_tags_tag ON idea_tags(tag_id);

-- Curated relation graph
CREATE TABLE IF NOT EXISTS relations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL REFERENCES ideas(id) ON DELETE CASCADE,
    target_id INTEGER NOT NULL REFERENCES ideas(id) ON DELETE CASCADE,
    kind TEXT NOT NULL DEFAULT 'related',
    confidence REAL NOT NULL DEFAULT 0.5 CHECK(confidence >= 0.0 AND confidence <= 1.0),
    created_at TEXT NOT NULL,
    UNIQUE (source_id, target_id, kind)
);

CREATE INDEX IF NOT EXISTS idx_relations_source ON relations(source_id);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
///
/// `dimension` fixes the vec0 embedding column width; it must match the
/// configured embedding dimension for the life of the database.
pub fn init_schema(conn: &Connection, dimension: usize) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // vec0 virtual table must be created separately (sqlite-vec syntax).
    conn.execute_batch(&format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS ideas_vec USING vec0(
            id INTEGER PRIMARY KEY,
            embedding FLOAT[{dimension}]
        );"
    ))?;

    Ok(())
}
