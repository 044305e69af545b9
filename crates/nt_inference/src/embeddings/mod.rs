use std::sync::Arc;

use nt_core::{Article, EmbeddedArticle, EmbeddingModel, Error, Result};
use tracing::info;

pub struct EmbeddingGenerator {
    model: Arc<dyn EmbeddingModel>,
}

impl EmbeddingGenerator {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }

    /// Embeds every headline. The first failure aborts the whole batch.
    pub async fn embed_articles(&self, articles: Vec<Article>) -> Result<Vec<EmbeddedArticle>> {
        info!("🔢 Embedding {} headlines with {}", articles.len(), self.model.name());
        let mut embedded = Vec::with_capacity(articles.len());
        for article in articles {
            let vector = self
                .model
                .generate_embeddings(&article.title)
                .await
                .map_err(|e| Error::Embedding(format!("'{}': {}", article.title, e)))?;
            embedded.push(EmbeddedArticle::new(article, vector));
        }
        info!("✨ Embeddings generated");
        Ok(embedded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DummyModel;
    use async_trait::async_trait;

    struct BrokenModel;

    #[async_trait]
    impl EmbeddingModel for BrokenModel {
        fn name(&self) -> &str {
            "broken"
        }

        async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("poison") {
                Err(Error::Embedding("model offline".to_string()))
            } else {
                Ok(vec![1.0, 0.0])
            }
        }
    }

    fn article(title: &str) -> Article {
        Article::new(title, "https://example.com/a", "2025-01-01", "https://example.com/rss")
    }

    #[tokio::test]
    async fn test_embedding_generation() {
        let generator = EmbeddingGenerator::new(Arc::new(DummyModel::new(16)));
        let embedded = generator
            .embed_articles(vec![article("Test Article"), article("Other story")])
            .await
            .unwrap();
        assert_eq!(embedded.len(), 2);
        assert_eq!(embedded[0].article.title, "Test Article");
        assert_eq!(embedded[0].vector.len(), 16);
    }

    #[tokio::test]
    async fn test_failure_is_fatal() {
        let generator = EmbeddingGenerator::new(Arc::new(BrokenModel));
        let result = generator
            .embed_articles(vec![article("fine"), article("poison pill")])
            .await;
        match result {
            Err(Error::Embedding(message)) => assert!(message.contains("poison pill")),
            other => panic!("expected embedding error, got {:?}", other.map(|v| v.len())),
        }
    }
}
