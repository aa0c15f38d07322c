use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Embeds query text through an OpenAI-compatible `/embeddings` endpoint.
/// Corpus embeddings are precomputed with the same model, so query vectors
/// come back in the corpus's dimension.
pub struct EmbeddingClient {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

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

impl EmbeddingClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            url: cfg.embed_url.clone(),
            model: cfg.embed_model.clone(),
            api_key: cfg.openai_api_key.clone(),
        })
    }

    pub async fn embed(&self, text: &str) -> Result<Array1<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("embedding request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("embedding request failed: {} {}", status, body));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .context("failed to decode embedding response")?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| anyhow!("embedding response contained no vectors"))?;
        Ok(Array1::from(vector))
    }
}
