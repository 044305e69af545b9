use std::sync::Arc;

use nt_core::{EmbeddingModel, Error, Result};
use tracing::info;

use crate::InferenceConfig;

pub mod dummy;
pub mod http;

pub use dummy::DummyModel;
pub use http::HttpEmbeddingModel;

/// Builds the embedding model named in `config.model`.
///
/// `dummy` is the offline hashing model; `http` (alias `openai`) talks to an
/// OpenAI-compatible endpoint at `config.model_url`.
pub fn create_model(config: &InferenceConfig) -> Result<Arc<dyn EmbeddingModel>> {
    let model: Arc<dyn EmbeddingModel> = match config.model.to_lowercase().as_str() {
        "dummy" => Arc::new(DummyModel::new(config.dimension.unwrap_or(dummy::DEFAULT_DIMENSION))),
        "http" | "openai" => Arc::new(HttpEmbeddingModel::new(
            config.model_url.clone(),
            config.model_name.clone(),
            config.api_key.clone(),
        )?),
        other => {
            return Err(Error::Config(format!(
                "Unknown embedding model '{}'. Available models: dummy, http",
                other
            )))
        }
    };
    info!("🧠 Embedding model ready (using {})", model.name());
    Ok(model)
}
