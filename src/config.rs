use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ZettelConfig {
    pub log: LogConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Master switch for the remote semantic backend. When off, every
    /// embedding comes from the deterministic local fallback.
    pub enabled: bool,
    /// Offline mode: keep the backend configured but never call it.
    pub offline: bool,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    /// System-wide vector dimension. Locally derived vectors are padded or
    /// truncated to this length.
    pub dimension: usize,
    /// Bound on each remote call; a timeout counts as provider-unavailable.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_limit: usize,
    /// Lexical score contribution per body occurrence. A tuning knob, not
    /// a semantic guarantee.
    pub body_weight: f64,
    /// Lexical score contribution per title occurrence.
    pub title_weight: f64,
}

impl Default for ZettelConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_zettel_dir()
            .join("zettel.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            offline: false,
            api_url: "https://api.openai.com/v1/embeddings".into(),
            api_key: String::new(),
            model: "text-embedding-3-small".into(),
            dimension: 1536,
            timeout_secs: 10,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            body_weight: 0.1,
            title_weight: 0.5,
        }
    }
}

/// Returns `~/.zettel/`
pub fn default_zettel_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".zettel")
}

/// Returns the default config file path: `~/.zettel/config.toml`
pub fn default_config_path() -> PathBuf {
    default_zettel_dir().join("config.toml")
}

impl ZettelConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ZettelConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (ZETTEL_DB, ZETTEL_LOG_LEVEL, ZETTEL_API_KEY, ZETTEL_OFFLINE).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ZETTEL_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("ZETTEL_LOG_LEVEL") {
            self.log.level = val;
        }
        if let Ok(val) = std::env::var("ZETTEL_API_KEY") {
            self.embedding.api_key = val;
        }
        if let Ok(val) = std::env::var("ZETTEL_OFFLINE") {
            self.embedding.offline = matches!(val.as_str(), "1" | "true" | "yes");
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
