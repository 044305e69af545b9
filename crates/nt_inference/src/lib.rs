pub mod embeddings;
pub mod labels;
pub mod models;

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// `dummy` or `http`
    pub model: String,
    pub model_url: Option<String>,
    pub model_name: Option<String>,
    pub api_key: Option<String>,
    /// Only used by the dummy model
    pub dimension: Option<usize>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "dummy".to_string(),
            model_url: None,
            model_name: None,
            api_key: None,
            dimension: None,
        }
    }
}

pub mod prelude {
    pub use super::embeddings::EmbeddingGenerator;
    pub use super::labels::KeywordLabeler;
    pub use super::models::create_model;
    pub use super::InferenceConfig;
    pub use nt_core::{EmbeddedArticle, EmbeddingModel, Error, LabelModel, Result};
}

pub use embeddings::EmbeddingGenerator;
pub use labels::KeywordLabeler;
pub use models::create_model;
