//! Core record and result type definitions.
//!
//! Defines [`Idea`] (the unit of retrieval), [`Tag`] and [`RelationEdge`]
//! (curated structure around ideas), [`RankedResult`] (the transient output
//! of every retrieval path), plus the [`SearchMode`] and [`IdeaFilters`]
//! request types.

use serde::{Deserialize, Serialize};

/// A single user-authored note, matching the `ideas` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    /// Integer primary key, stable for the life of the note.
    pub id: i64,
    /// Short display title. May be empty.
    pub title: String,
    /// Full note text.
    pub body: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-modification timestamp. Recency tie-breaks use this.
    pub updated_at: String,
    /// Archived notes are hidden from default listings but still searchable.
    pub archived: bool,
    pub favorite: bool,
    /// User-assigned importance, 0 when unset.
    pub importance: i64,
    /// Cached embedding for the idea's current text, if one has been computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Idea {
    /// The text that gets embedded: title and body joined, title first.
    pub fn embeddable_text(&self) -> String {
        if self.title.is_empty() {
            self.body.clone()
        } else {
            format!("{}\n{}", self.title, self.body)
        }
    }
}

/// A tag, unique by name, attached to ideas many-to-many.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A directed, curated link between two ideas.
///
/// Edges are produced by analysis elsewhere; the retrieval engine only
/// reads them, ordered by confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationEdge {
    pub source_id: i64,
    pub target_id: i64,
    /// Relationship label (e.g. `"extends"`, `"contradicts"`).
    pub kind: String,
    /// Curation confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

/// Which retrieval path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Substring match against title/body.
    Lexical,
    /// Nearest neighbor in embedding space.
    Vector,
    /// Found by both paths; the score is the max of the two.
    Both,
    /// A curated relation edge (related-idea resolution, tier 1).
    Relation,
    /// Shared tags with the source idea (related-idea resolution, tier 3).
    TagOverlap,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Vector => "vector",
            Self::Both => "both",
            Self::Relation => "relation",
            Self::TagOverlap => "tag_overlap",
        }
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored retrieval hit, produced and consumed in-process and never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub idea_id: i64,
    /// Relevance in `[0.0, 1.0]`. Always clamped at construction.
    pub score: f64,
    pub source: ResultSource,
}

impl RankedResult {
    /// Build a result with the score clamped into `[0.0, 1.0]`.
    pub fn new(idea_id: i64, score: f64, source: ResultSource) -> Self {
        Self {
            idea_id,
            score: score.clamp(0.0, 1.0),
            source,
        }
    }
}

/// Retrieval strategy requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Substring matching only.
    Lexical,
    /// Embedding nearest-neighbor only. Degrades to lexical when the
    /// semantic backend is disabled or unreachable.
    Vector,
    /// Both paths, merged and re-ranked.
    Hybrid,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Vector => "vector",
            Self::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexical" => Ok(Self::Lexical),
            "vector" => Ok(Self::Vector),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(format!("unknown search mode: {s}")),
        }
    }
}

/// Filters applied identically to every retrieval path before merging,
/// so an excluded idea can never surface through either path.
#[derive(Debug, Clone, Default)]
pub struct IdeaFilters {
    /// `Some(false)` excludes archived ideas, `Some(true)` returns only them.
    pub archived: Option<bool>,
    pub favorite: Option<bool>,
    /// When non-empty, only ideas carrying at least one of these tags match.
    pub tag_ids: Vec<i64>,
}
