use thiserror::Error;
use tracing::info;

use crate::embedder::{EmbedError, Embedder};
use crate::matcher::corpus::Corpus;

/// Batches logged per progress line during the build.
const PROGRESS_EVERY_BATCHES: usize = 5;

#[derive(Debug, Error)]
pub enum EmbeddingBuildError {
    #[error("Cannot build an embedding index over an empty corpus")]
    EmptyCorpus,

    #[error("Encoding failed during index build: {0}")]
    Encode(#[from] EmbedError),

    #[error("Encoder returned inconsistent dimensions: expected {expected}, got {got}")]
    InconsistentDimension { expected: usize, got: usize },
}

/// One embedding vector per corpus record, positionally aligned: entry `i`
/// embeds `corpus[i].description_text`. Built once at startup and immutable
/// thereafter.
#[derive(Debug)]
pub struct EmbeddingIndex {
    vectors: Vec<Vec<f32>>,
    dim: usize,
}

impl EmbeddingIndex {
    /// Encodes every corpus description in batches of `batch_size` to bound
    /// peak memory. Batch boundaries must not affect output; the embedder
    /// contract requires batch-size-invariant encoding. Progress logging is
    /// observability only.
    pub async fn build(
        corpus: &Corpus,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self, EmbeddingBuildError> {
        if corpus.is_empty() {
            return Err(EmbeddingBuildError::EmptyCorpus);
        }
        let batch_size = batch_size.max(1);

        let descriptions: Vec<String> = corpus.descriptions().map(str::to_owned).collect();
        info!(
            "Encoding {} job descriptions in batches of {}...",
            descriptions.len(),
            batch_size
        );

        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(descriptions.len());
        let mut dim = 0usize;

        for (batch_no, batch) in descriptions.chunks(batch_size).enumerate() {
            // The batch buffer is consumed here and dropped before the next
            // iteration, so peak memory stays O(batch_size) beyond the index.
            let encoded = embedder.encode_batch(batch).await?;

            for vector in encoded {
                if dim == 0 {
                    dim = vector.len();
                } else if vector.len() != dim {
                    return Err(EmbeddingBuildError::InconsistentDimension {
                        expected: dim,
                        got: vector.len(),
                    });
                }
                vectors.push(vector);
            }

            if (batch_no + 1) % PROGRESS_EVERY_BATCHES == 0 {
                info!(
                    "Processed {}/{} job descriptions",
                    vectors.len(),
                    descriptions.len()
                );
            }
        }

        info!("Embedding index built: {} vectors of dim {}", vectors.len(), dim);

        Ok(Self { vectors, dim })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Embedding dimension (the model's native output size).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    #[cfg(test)]
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Self {
        let dim = vectors.first().map(Vec::len).unwrap_or(0);
        Self { vectors, dim }
    }
}
