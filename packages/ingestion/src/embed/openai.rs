//! Embedding provider using OpenAI's text-embedding-3-small.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};
use crate::traits::Embedder;

const EMBEDDING_MODEL: &str = "text-embedding-3-small";
const EMBEDDING_DIM: usize = 1536;

/// OpenAI-backed embedding provider.
///
/// This is the only external network dependency of the engine; wrap it
/// in [`CachedEmbedder`](crate::embed::CachedEmbedder) so repeated
/// canonical forms cost one call.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: SecretString,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: EMBEDDING_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post("https://api.openai.com/v1/embeddings")
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .map_err(|e| IngestError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::Embedding(format!(
                "OpenAI API error {status}: {body}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| IngestError::Embedding(e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| IngestError::Embedding("no embedding returned".to_string()))
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}
