//! Remote embedding backend for OpenAI-compatible `/embeddings` endpoints.
//!
//! Blocking HTTP with a bounded timeout; any transport, auth, or decode
//! failure maps to [`RetrievalError::ProviderUnavailable`] so the engine
//! can degrade instead of erroring. Successful vectors are cached per text
//! for the life of the process.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EmbeddingBackend;
use crate::config::EmbeddingConfig;
use crate::error::RetrievalError;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible remote embedding provider.
pub struct RemoteBackend {
    client: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
    model: String,
    cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl RemoteBackend {
    pub fn new(config: &EmbeddingConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn request(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .map_err(|e| RetrievalError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RetrievalError::ProviderUnavailable(format!(
                "embedding API returned HTTP {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .map_err(|e| RetrievalError::ProviderUnavailable(e.to_string()))?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                RetrievalError::ProviderUnavailable("embedding API returned no data".into())
            })
    }
}

impl EmbeddingBackend for RemoteBackend {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        if let Some(cached) = self
            .cache
            .lock()
            .ok()
            .and_then(|c| c.get(text).cloned())
        {
            return Ok(cached);
        }

        let vector = self.request(text)?;
        debug!(model = %self.model, len = vector.len(), "remote embedding computed");

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(text.to_string(), vector.clone());
        }
        Ok(vector)
    }
}
