//! Notes store: the persistence collaborator the retrieval engine reads.
//!
//! [`NotesStore`] is the seam the engine depends on; [`SqliteStore`] is the
//! production implementation over rusqlite. The store also carries the
//! write surface the CLI needs (create ideas, tag them, curate relations).
//! The engine itself only ever reads, except for the best-effort embedding
//! cache write in related-idea resolution.

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{embedding_from_bytes, embedding_to_bytes};
use crate::types::{Idea, IdeaFilters, RelationEdge, Tag};

/// Read contract the retrieval engine requires from persistence.
///
/// Every method is a point-in-time read; [`NotesStore::cache_embedding`]
/// is the single write, and callers treat its failure as non-fatal.
pub trait NotesStore {
    fn get_idea(&self, id: i64) -> Result<Option<Idea>>;

    /// Ideas passing the given filters, most recently updated first.
    fn list_ideas(&self, filters: &IdeaFilters) -> Result<Vec<Idea>>;

    fn list_tags(&self, idea_id: i64) -> Result<Vec<Tag>>;

    /// Outgoing curated edges, highest confidence first.
    fn list_relations(&self, source_id: i64) -> Result<Vec<RelationEdge>>;

    /// Persist a freshly computed embedding for an idea. Best-effort from
    /// the engine's point of view.
    fn cache_embedding(&self, idea_id: i64, embedding: &[f32]) -> Result<()>;
}

/// SQLite-backed notes store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a new idea and return its id.
    pub fn create_idea(
        &self,
        title: &str,
        body: &str,
        favorite: bool,
        importance: i64,
    ) -> Result<i64> {
        if body.trim().is_empty() {
            bail!("idea body must not be empty");
        }
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO ideas (title, body, created_at, updated_at, favorite, importance) \
                 VALUES (?1, ?2, ?3, ?3, ?4, ?5)",
                params![title, body, now, favorite, importance],
            )
            .context("failed to insert idea")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Attach a tag by name, creating the tag row if needed. Idempotent.
    pub fn tag_idea(&self, idea_id: i64, name: &str) -> Result<i64> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            bail!("tag name must not be empty");
        }
        self.conn.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1)",
            params![name],
        )?;
        let tag_id: i64 = self.conn.query_row(
            "SELECT id FROM tags WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "INSERT OR IGNORE INTO idea_tags (idea_id, tag_id) VALUES (?1, ?2)",
            params![idea_id, tag_id],
        )?;
        Ok(tag_id)
    }

    /// Record a curated relation edge. Duplicate (source, target, kind)
    /// triples are idempotent.
    pub fn add_relation(
        &self,
        source_id: i64,
        target_id: i64,
        kind: &str,
        confidence: f64,
    ) -> Result<()> {
        if !(0.0..=1.0).contains(&confidence) {
            bail!("relation confidence must be in [0.0, 1.0], got {confidence}");
        }
        if self.get_idea(source_id)?.is_none() {
            bail!("source idea not found: {source_id}");
        }
        if self.get_idea(target_id)?.is_none() {
            bail!("target idea not found: {target_id}");
        }
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO relations (source_id, target_id, kind, confidence, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![source_id, target_id, kind, confidence, now],
        )?;
        Ok(())
    }

    /// Look up a tag by exact name.
    pub fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, name FROM tags WHERE name = ?1",
                params![name.trim().to_lowercase()],
                |row| {
                    Ok(Tag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(tag)
    }

    /// Tags whose name contains the query, ordered by name.
    pub fn suggest_tags(&self, query: &str, limit: usize) -> Result<Vec<Tag>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "SELECT id, name FROM tags WHERE name LIKE ?1 ORDER BY name LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(
                params![format!("%{}%", query.trim().to_lowercase()), limit as i64],
                |row| {
                    Ok(Tag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn idea_from_row(row: &Row<'_>) -> rusqlite::Result<Idea> {
        let blob: Option<Vec<u8>> = row.get(8)?;
        Ok(Idea {
            id: row.get(0)?,
            title: row.get(1)?,
            body: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
            archived: row.get(5)?,
            favorite: row.get(6)?,
            importance: row.get(7)?,
            embedding: blob.map(|b| embedding_from_bytes(&b)),
        })
    }
}

const IDEA_COLUMNS: &str =
    "id, title, body, created_at, updated_at, archived, favorite, importance, embedding";

impl NotesStore for SqliteStore {
    fn get_idea(&self, id: i64) -> Result<Option<Idea>> {
        let idea = self
            .conn
            .query_row(
                &format!("SELECT {IDEA_COLUMNS} FROM ideas WHERE id = ?1"),
                params![id],
                Self::idea_from_row,
            )
            .optional()
            .context("failed to fetch idea")?;
        Ok(idea)
    }

    fn list_ideas(&self, filters: &IdeaFilters) -> Result<Vec<Idea>> {
        let mut sql = format!("SELECT {IDEA_COLUMNS} FROM ideas WHERE 1=1");
        let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(archived) = filters.archived {
            sql.push_str(&format!(" AND archived = ?{}", args.len() + 1));
            args.push(Box::new(archived));
        }
        if let Some(favorite) = filters.favorite {
            sql.push_str(&format!(" AND favorite = ?{}", args.len() + 1));
            args.push(Box::new(favorite));
        }
        if !filters.tag_ids.is_empty() {
            let placeholders: Vec<String> = filters
                .tag_ids
                .iter()
                .enumerate()
                .map(|(i, _)| format!("?{}", args.len() + 1 + i))
                .collect();
            sql.push_str(&format!(
                " AND id IN (SELECT idea_id FROM idea_tags WHERE tag_id IN ({}))",
                placeholders.join(", ")
            ));
            for tag_id in &filters.tag_ids {
                args.push(Box::new(*tag_id));
            }
        }

        sql.push_str(" ORDER BY updated_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::types::ToSql> =
            args.iter().map(|a| a.as_ref()).collect();
        let rows = stmt
            .query_map(params.as_slice(), Self::idea_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to list ideas")?;
        Ok(rows)
    }

    fn list_tags(&self, idea_id: i64) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name FROM tags t \
             JOIN idea_tags it ON it.tag_id = t.id \
             WHERE it.idea_id = ?1 ORDER BY t.name",
        )?;
        let rows = stmt
            .query_map(params![idea_id], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn list_relations(&self, source_id: i64) -> Result<Vec<RelationEdge>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_id, target_id, kind, confidence FROM relations \
             WHERE source_id = ?1 ORDER BY confidence DESC, target_id",
        )?;
        let rows = stmt
            .query_map(params![source_id], |row| {
                Ok(RelationEdge {
                    source_id: row.get(0)?,
                    target_id: row.get(1)?,
                    kind: row.get(2)?,
                    confidence: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn cache_embedding(&self, idea_id: i64, embedding: &[f32]) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE ideas SET embedding = ?1 WHERE id = ?2",
            params![embedding_to_bytes(embedding), idea_id],
        )?;
        if updated == 0 {
            bail!("idea not found: {idea_id}");
        }
        Ok(())
    }
}
