//! Text-to-vector embedding pipeline.
//!
//! Provides the [`EmbeddingBackend`] trait for remote providers and the
//! [`Embedder`] facade the retrieval engine talks to. The facade never
//! fails: empty input yields a zero vector, and any backend failure falls
//! back to a deterministic local bag-of-words vector so the pipeline always
//! has something to compare. The fallback is not semantically meaningful
//! across different texts; it only guarantees reproducibility.
//!
//! All methods are synchronous; remote calls carry a bounded timeout and
//! treat timing out the same as being unreachable.

pub mod remote;

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::error::RetrievalError;
use crate::similarity::pad_or_truncate;

/// A remote embedding provider. Failures are typed so callers can
/// distinguish "unreachable" from caller bugs.
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a single text string into a vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
}

/// Facade over the optional remote backend plus the local fallback.
pub struct Embedder {
    backend: Option<Box<dyn EmbeddingBackend>>,
    dimension: usize,
}

impl Embedder {
    /// Build from config. The remote backend is wired up only when the
    /// semantic feature is enabled, not in offline mode, and credentialed;
    /// otherwise every call uses the local fallback.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        let backend: Option<Box<dyn EmbeddingBackend>> =
            if config.enabled && !config.offline && !config.api_key.is_empty() {
                Some(Box::new(remote::RemoteBackend::new(config)))
            } else {
                debug!(
                    enabled = config.enabled,
                    offline = config.offline,
                    "remote embeddings unavailable, using local fallback"
                );
                None
            };
        Self {
            backend,
            dimension: config.dimension,
        }
    }

    /// Facade with an explicit backend, for tests and alternate providers.
    pub fn with_backend(backend: Box<dyn EmbeddingBackend>, dimension: usize) -> Self {
        Self {
            backend: Some(backend),
            dimension,
        }
    }

    /// Facade with no remote backend at all.
    pub fn disabled(dimension: usize) -> Self {
        Self {
            backend: None,
            dimension,
        }
    }

    /// Whether a remote backend is configured and believed reachable.
    /// The engine checks this before choosing a semantic retrieval path.
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    #[allow(dead_code)]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed a text into a vector of exactly `dimension` entries.
    ///
    /// Never fails: empty input returns a zero vector, and a backend error
    /// is absorbed into the local fallback.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        if text.trim().is_empty() {
            return vec![0.0; self.dimension];
        }

        if let Some(backend) = &self.backend {
            match backend.embed(text) {
                Ok(v) => return pad_or_truncate(v, self.dimension),
                Err(e) => {
                    debug!(error = %e, "remote embedding failed, using local fallback");
                }
            }
        }

        fallback_embedding(text, self.dimension)
    }
}

/// Deterministic local fallback: case-folded whitespace tokens, a frequency
/// vector over the distinct tokens of this text in sorted order,
/// L2-normalized, padded or truncated to `dimension`.
pub fn fallback_embedding(text: &str, dimension: usize) -> Vec<f32> {
    // BTreeMap fixes the token order, which fixes the vector.
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    let lowered = text.to_lowercase();
    for token in lowered.split_whitespace() {
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut v: Vec<f32> = counts.values().map(|c| *c as f32).collect();

    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }

    pad_or_truncate(v, dimension)
}
