use nt_core::{cosine_similarity, EmbeddedArticle, Error, Result};

/// Checks that every vector is finite and shares one dimension; returns it.
pub fn validate_vectors(articles: &[EmbeddedArticle]) -> Result<usize> {
    let Some(first) = articles.first() else {
        return Ok(0);
    };
    let dimension = first.vector.len();
    if dimension == 0 {
        return Err(Error::InvalidEmbedding {
            index: 0,
            reason: "empty vector".to_string(),
        });
    }

    for (index, embedded) in articles.iter().enumerate() {
        if embedded.vector.len() != dimension {
            return Err(Error::InvalidEmbedding {
                index,
                reason: format!("expected dimension {}, got {}", dimension, embedded.vector.len()),
            });
        }
        if let Some(pos) = embedded.vector.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidEmbedding {
                index,
                reason: format!("non-finite value at position {}", pos),
            });
        }
    }
    Ok(dimension)
}

/// Dense symmetric matrix of pairwise cosine similarities.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn from_vectors(vectors: &[&[f32]]) -> Self {
        let size = vectors.len();
        let mut values = vec![0.0f32; size * size];
        for i in 0..size {
            values[i * size + i] = 1.0;
            for j in (i + 1)..size {
                let sim = cosine_similarity(vectors[i], vectors[j]);
                values[i * size + j] = sim;
                values[j * size + i] = sim;
            }
        }
        Self { size, values }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.size + j]
    }
}

/// Mean of the given vectors.
pub fn centroid<'a>(vectors: impl IntoIterator<Item = &'a [f32]>, dimension: usize) -> Vec<f32> {
    let mut sum = vec![0.0f64; dimension];
    let mut count = 0usize;
    for vector in vectors {
        for (acc, v) in sum.iter_mut().zip(vector) {
            *acc += *v as f64;
        }
        count += 1;
    }
    if count == 0 {
        return vec![0.0; dimension];
    }
    sum.into_iter().map(|v| (v / count as f64) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::Article;

    fn embedded(vector: Vec<f32>) -> EmbeddedArticle {
        EmbeddedArticle::new(
            Article::new("t", "https://a.com", "2025-01-01", "https://a.com/rss"),
            vector,
        )
    }

    #[test]
    fn test_validate_vectors() {
        assert_eq!(validate_vectors(&[]).unwrap(), 0);
        assert_eq!(validate_vectors(&[embedded(vec![1.0, 2.0])]).unwrap(), 2);

        let wrong_dim = validate_vectors(&[embedded(vec![1.0, 2.0]), embedded(vec![1.0])]);
        assert!(matches!(wrong_dim, Err(Error::InvalidEmbedding { index: 1, .. })));

        let nan = validate_vectors(&[embedded(vec![1.0, f32::NAN])]);
        assert!(matches!(nan, Err(Error::InvalidEmbedding { index: 0, .. })));

        let empty = validate_vectors(&[embedded(vec![])]);
        assert!(empty.is_err());
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let a = [1.0f32, 0.0];
        let b = [0.6f32, 0.8];
        let c = [0.0f32, 1.0];
        let matrix = SimilarityMatrix::from_vectors(&[&a, &b, &c]);
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(0, 0), 1.0);
        assert!((matrix.get(0, 1) - 0.6).abs() < 1e-6);
        assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
        assert!((matrix.get(1, 2) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_centroid() {
        let a = [1.0f32, 0.0];
        let b = [0.0f32, 1.0];
        assert_eq!(centroid([&a[..], &b[..]], 2), vec![0.5, 0.5]);
        assert_eq!(centroid(std::iter::empty(), 2), vec![0.0, 0.0]);
    }
}
