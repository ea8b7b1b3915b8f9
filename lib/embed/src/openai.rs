//! OpenAI-compatible embedding client.

use crate::{EmbedError, EmbeddingProvider};
use async_trait::async_trait;
use remedex_core::Vector;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Connection settings for [`OpenAiEmbedder`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Retries for transient failures (5xx, 429, connection errors). Zero disables retrying.
    pub max_retries: u32,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: [&'a str; 1],
    model: &'a str,
    encoding_format: &'static str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Calls `POST {base_url}/embeddings` with a single input per request.
pub struct OpenAiEmbedder {
    config: OpenAiConfig,
    http: ClientWithMiddleware,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("timeout", &self.config.timeout)
            .field("max_retries", &self.config.max_retries)
            .finish()
    }
}

impl OpenAiEmbedder {
    pub fn new(config: OpenAiConfig) -> Result<Self, EmbedError> {
        if config.api_key.trim().is_empty() {
            return Err(EmbedError::Config("API key is empty".to_string()));
        }
        if config.model.trim().is_empty() {
            return Err(EmbedError::Config("model name is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbedError::Config(e.to_string()))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let http = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }

    fn classify(&self, e: reqwest_middleware::Error) -> EmbedError {
        match e {
            reqwest_middleware::Error::Reqwest(inner) if inner.is_timeout() => {
                EmbedError::Timeout(self.config.timeout)
            }
            other => other.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector, EmbedError> {
        let request = EmbeddingRequest {
            input: [text],
            model: &self.config.model,
            encoding_format: "float",
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                EmbedError::Timeout(self.config.timeout)
            } else {
                EmbedError::from(e)
            }
        })?;

        if !status.is_success() {
            return Err(EmbedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = serde_json::from_str(&body)
            .map_err(|e| EmbedError::MalformedResponse(e.to_string()))?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or(EmbedError::EmptyResponse)?;

        debug!(model = %self.config.model, dim = embedding.len(), "embedding received");
        Ok(Vector::new(embedding))
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn embedder_for(server: &Server) -> OpenAiEmbedder {
        OpenAiEmbedder::new(
            OpenAiConfig::new("test-key")
                .base_url(server.url())
                .max_retries(0)
                .timeout(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_embed_parses_first_vector() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "input": ["Arnica - bruising, muscle soreness"],
                "model": "text-embedding-3-small"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.1,-0.2,0.3]}],"model":"text-embedding-3-small"}"#)
            .create_async()
            .await;

        let vector = embedder_for(&server)
            .embed("Arnica - bruising, muscle soreness")
            .await
            .unwrap();

        assert_eq!(vector.as_slice(), &[0.1, -0.2, 0.3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let err = embedder_for(&server).embed("headache").await.unwrap_err();
        match err {
            EmbedError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let err = embedder_for(&server).embed("fever").await.unwrap_err();
        assert!(matches!(err, EmbedError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_data() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;

        let err = embedder_for(&server).embed("cough").await.unwrap_err();
        assert!(matches!(err, EmbedError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let mut server = Server::new_async().await;
        let failing = server
            .mock("POST", "/embeddings")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let embedder = OpenAiEmbedder::new(
            OpenAiConfig::new("test-key")
                .base_url(server.url())
                .max_retries(1),
        )
        .unwrap();

        let err = embedder.embed("nausea").await.unwrap_err();
        assert!(matches!(err, EmbedError::Status { status: 503, .. }));
        failing.assert_async().await;
    }

    #[tokio::test]
    async fn test_slow_response_is_a_timeout() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(1500));
                std::io::Write::write_all(w, br#"{"data":[{"embedding":[0.1]}]}"#)
            })
            .create_async()
            .await;

        let embedder = OpenAiEmbedder::new(
            OpenAiConfig::new("test-key")
                .base_url(server.url())
                .max_retries(0)
                .timeout(Duration::from_millis(200)),
        )
        .unwrap();

        let err = embedder.embed("sore throat").await.unwrap_err();
        assert!(
            matches!(err, EmbedError::Timeout(t) if t == Duration::from_millis(200)),
            "got {:?}",
            err
        );
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let err = OpenAiEmbedder::new(OpenAiConfig::new("  ")).unwrap_err();
        assert!(matches!(err, EmbedError::Config(_)));
    }
}
