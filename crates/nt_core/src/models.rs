use async_trait::async_trait;
use crate::Result;

#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    fn name(&self) -> &str;

    /// Generate a fixed-length embedding for a headline
    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
pub trait LabelModel: Send + Sync {
    /// Short phrase summarizing a set of headlines. May be empty.
    async fn summarize(&self, titles: &[String]) -> Result<String>;
}
