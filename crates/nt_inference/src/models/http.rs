use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nt_core::{EmbeddingModel, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for any OpenAI-compatible `/embeddings` endpoint.
pub struct HttpEmbeddingModel {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl HttpEmbeddingModel {
    pub fn new(base_url: Option<String>, model: Option<String>, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

impl fmt::Debug for HttpEmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpEmbeddingModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl EmbeddingModel for HttpEmbeddingModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            input: text,
            model: &self.model,
        };

        let mut builder = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await?
            .error_for_status()?
            .json::<EmbeddingResponse>()
            .await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::Embedding(format!("{} returned no embedding", self.model)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let model = HttpEmbeddingModel::new(
            Some("http://localhost:8080/v1/".to_string()),
            None,
            Some("sk-secret".to_string()),
        )
        .unwrap();
        let debug = format!("{:?}", model);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("http://localhost:8080/v1\""));
        assert_eq!(model.name(), DEFAULT_MODEL);
    }

    #[test]
    fn test_response_shape() {
        let body = r#"{"data": [{"embedding": [0.1, 0.2, 0.3], "index": 0}], "model": "m"}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2, 0.3]);
    }
}
