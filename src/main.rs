mod cli;
mod config;
mod db;
mod embedding;
mod engine;
mod error;
mod index;
mod similarity;
mod store;
mod types;

use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use types::SearchMode;

#[derive(Parser)]
#[command(name = "zettel", version, about = "Personal knowledge base with hybrid search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a new idea
    Add {
        /// Short title
        title: String,
        /// Note body
        body: String,
        /// Tags to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        favorite: bool,
        #[arg(long, default_value_t = 0)]
        importance: i64,
    },
    /// Search ideas by keyword, meaning, or both
    Search {
        query: String,
        /// lexical, vector, or hybrid
        #[arg(long, default_value = "hybrid", value_parser = SearchMode::from_str)]
        mode: SearchMode,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Only favorites
        #[arg(long)]
        favorite: bool,
        /// Include archived ideas
        #[arg(long)]
        archived: bool,
        /// Restrict to ideas carrying one of these tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show ideas related to one idea
    Related {
        idea_id: i64,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Record a curated relation edge between two ideas
    Relate {
        source_id: i64,
        target_id: i64,
        #[arg(long, default_value = "related")]
        kind: String,
        #[arg(long, default_value_t = 0.5)]
        confidence: f64,
    },
    /// Attach tags to an existing idea
    Tag {
        idea_id: i64,
        /// Tag names to attach
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Suggest tags matching a query
    Tags {
        query: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::ZettelConfig::load()?;

    let filter = EnvFilter::try_new(&config.log.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Add {
            title,
            body,
            tags,
            favorite,
            importance,
        } => cli::add::add(&config, &title, &body, &tags, favorite, importance)?,
        Command::Search {
            query,
            mode,
            limit,
            offset,
            favorite,
            archived,
            tags,
        } => cli::search::search(
            &config,
            &query,
            mode,
            limit.unwrap_or(config.retrieval.default_limit),
            offset,
            favorite,
            archived,
            &tags,
        )?,
        Command::Related { idea_id, limit } => cli::related::related(&config, idea_id, limit)?,
        Command::Relate {
            source_id,
            target_id,
            kind,
            confidence,
        } => cli::relate::relate(&config, source_id, target_id, &kind, confidence)?,
        Command::Tag { idea_id, names } => cli::tags::attach(&config, idea_id, &names)?,
        Command::Tags { query, limit } => cli::tags::suggest(&config, &query, limit)?,
    }

    Ok(())
}
