//! Zettel: a personal knowledge base with hybrid retrieval.
//!
//! Users capture short "idea" notes, tag them, and link them with curated
//! relation edges. The engineering core is the retrieval engine: it turns
//! a free-text query (or an existing note) into a ranked set of notes by
//! combining lexical substring matching, vector-similarity search, and the
//! relation graph, degrading gracefully to simpler strategies whenever the
//! semantic backend is unavailable.
//!
//! # Architecture
//!
//! - **Storage**: SQLite, with [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   for nearest-neighbor lookup over embedding vectors
//! - **Embeddings**: an OpenAI-compatible HTTP provider when configured and
//!   reachable, a deterministic local bag-of-words fallback otherwise
//! - **Search**: lexical and vector result sets merged by idea id, scored
//!   in `[0, 1]`, deduplicated, and ranked
//!
//! # Modules
//!
//! - [`config`]: configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization and schema
//! - [`embedding`]: embedding facade, remote backend plus local fallback
//! - [`engine`]: hybrid search and related-idea resolution
//! - [`similarity`]: cosine similarity and distance conversion helpers
//! - [`store`] / [`index`]: collaborator seams over persistence and the
//!   vector index

pub mod config;
pub mod db;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod index;
pub mod similarity;
pub mod store;
pub mod types;

