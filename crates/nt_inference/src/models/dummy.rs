use std::fmt;

use nt_core::text::{clean_text, content_terms};
use nt_core::{EmbeddingModel, Result};
use sha2::{Digest, Sha256};

pub const DEFAULT_DIMENSION: usize = 256;

/// Deterministic bag-of-words embedding for offline runs and tests.
///
/// Every content term is hashed into one signed bucket, so headlines sharing
/// terms end up close under cosine similarity.
pub struct DummyModel {
    dimension: usize,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl DummyModel {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, term: &str) -> (usize, f32) {
        let digest = Sha256::digest(term.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        let hash = u64::from_le_bytes(bytes);
        let index = (hash % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait::async_trait]
impl EmbeddingModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate_embeddings(&self, text: &str) -> Result<Vec<f32>> {
        let mut terms = content_terms(text);
        if terms.is_empty() {
            terms = clean_text(text).split_whitespace().map(str::to_string).collect();
        }

        let mut embedding = vec![0.0f32; self.dimension];
        for term in &terms {
            let (index, sign) = self.bucket(term);
            embedding[index] += sign;
        }

        let norm = embedding.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::cosine_similarity;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::default();

        let a = model.generate_embeddings("Senate passes climate bill").await.unwrap();
        let b = model.generate_embeddings("Climate bill passes Senate").await.unwrap();
        let c = model.generate_embeddings("Local team wins championship").await.unwrap();

        assert_eq!(a.len(), DEFAULT_DIMENSION);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
        assert!(cosine_similarity(&a, &c) < 0.5);
    }

    #[tokio::test]
    async fn test_dummy_model_is_deterministic() {
        let model = DummyModel::new(64);
        let first = model.generate_embeddings("Markets fall sharply").await.unwrap();
        let second = model.generate_embeddings("Markets fall sharply").await.unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|v| v.is_finite()));
    }
}
