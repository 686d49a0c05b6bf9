//! Embedding provider client.
//!
//! Turns free text into a dense vector through an OpenAI-compatible
//! `/v1/embeddings` endpoint. Requests are paced by a [`RateLimiter`] and
//! transient failures (rate limits, timeouts, refused connections) are
//! retried with exponential backoff.

use std::time::Duration;

use async_trait::async_trait;
use backon::Retryable;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use crate::resilience::{retry_policy, RateLimiter};

const PROVIDER_NAME: &str = "openai";

/// Source of query and record vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> ResolveResult<Vec<f32>>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible embeddings API.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    rate_limiter: RateLimiter,
}

impl OpenAiEmbedder {
    /// Create a client for `model` at `endpoint`.
    ///
    /// Fails with [`ResolveError::Configuration`] when no API key is set.
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> ResolveResult<Self> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ResolveError::Configuration(
                    "no embedding API key configured (set openai_api_key or REEL_OPENAI_API_KEY)"
                        .to_string(),
                )
            })?;

        let http = Client::builder()
            .user_agent("reelmatch/0.1.0 (https://github.com/oxur/reelmatch)")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model: model.into(),
            endpoint: endpoint.into(),
            rate_limiter: RateLimiter::new(5),
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config) -> ResolveResult<Self> {
        Self::new(
            config.openai_api_key.clone(),
            config.embedding_model.clone(),
            config.embedding_endpoint.clone(),
        )
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request_embedding(&self, text: &str) -> ResolveResult<Vec<f32>> {
        self.rate_limiter.acquire().await;

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: [text],
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ResolveError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(format!("HTTP {status}: {}", body.trim())));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("malformed response: {e}")))?;

        match parsed.data.into_iter().next() {
            Some(data) if !data.embedding.is_empty() => Ok(data.embedding),
            Some(_) => Err(provider_error("response held an empty embedding")),
            None => Err(provider_error("response held no embeddings")),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> ResolveResult<Vec<f32>> {
        (|| self.request_embedding(text))
            .retry(retry_policy())
            .when(ResolveError::is_transient)
            .notify(|err, delay| {
                log::warn!("Embedding request failed ({err}), retrying in {delay:?}");
            })
            .await
    }
}

fn provider_error(message: impl Into<String>) -> ResolveError {
    ResolveError::Provider {
        provider: PROVIDER_NAME.to_string(),
        message: message.into(),
    }
}
