//! Similarity Ranker — exact brute-force cosine ranking over the embedding
//! index. Corpus sizes are bounded (thousands), so a linear scan is the
//! intended behavior; an approximate index would be an optional backend
//! behind the same `rank` contract, not a replacement.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::matcher::index::EmbeddingIndex;

#[derive(Debug, Error)]
#[error("Query vector dimension {got} does not match index dimension {expected}")]
pub struct InvalidQueryError {
    pub expected: usize,
    pub got: usize,
}

/// A scored corpus entry. Ordering: higher score ranks first; equal scores
/// tie-break by ascending corpus index, so ranking is deterministic for a
/// fixed index and query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub score: f32,
}

impl Eq for Hit {}

impl Ord for Hit {
    fn cmp(&self, other: &Self) -> Ordering {
        // Scores are sanitized before construction, so total_cmp never sees
        // NaN in practice; it keeps the ordering total regardless.
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Hit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cosine similarity in [-1, 1]. Zero-norm vectors (degenerate all-zero
/// embeddings) and non-finite results normalize to the sentinel 0.0 rather
/// than propagating.
pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> f32 {
    let dot: f32 = query.iter().zip(candidate).map(|(a, b)| a * b).sum();
    let norm_q: f32 = query.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_c: f32 = candidate.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_q == 0.0 || norm_c == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_q * norm_c);
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

/// Scores every index entry against the query and returns the k best,
/// descending by score with ascending-index tie-break. `k` is clamped to
/// `[0, index.len()]`. O(n·dim) scoring plus O(n log k) selection via a
/// bounded min-heap.
pub fn rank(
    query: &[f32],
    index: &EmbeddingIndex,
    k: usize,
) -> Result<Vec<Hit>, InvalidQueryError> {
    if query.len() != index.dim() {
        return Err(InvalidQueryError {
            expected: index.dim(),
            got: query.len(),
        });
    }

    let k = k.min(index.len());
    if k == 0 {
        return Ok(Vec::new());
    }

    // Min-heap of the k best hits seen so far; the weakest sits on top.
    let mut heap: BinaryHeap<std::cmp::Reverse<Hit>> = BinaryHeap::with_capacity(k + 1);

    for (i, candidate) in index.vectors().iter().enumerate() {
        let hit = Hit {
            index: i,
            score: cosine_similarity(query, candidate),
        };
        if heap.len() < k {
            heap.push(std::cmp::Reverse(hit));
        } else if hit > heap.peek().map(|r| r.0).unwrap_or(hit) {
            heap.pop();
            heap.push(std::cmp::Reverse(hit));
        }
    }

    let mut hits: Vec<Hit> = heap.into_iter().map(|r| r.0).collect();
    hits.sort_by(|a, b| b.cmp(a));
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(vectors: Vec<Vec<f32>>) -> EmbeddingIndex {
        EmbeddingIndex::from_vectors(vectors)
    }

    #[test]
    fn test_identical_vector_scores_one() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vector_scores_minus_one() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 1.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_non_finite_score_normalizes_to_zero() {
        // Large values can overflow the dot product to infinity.
        let sim = cosine_similarity(&[f32::MAX, f32::MAX], &[f32::MAX, f32::MAX]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_rank_orders_by_descending_score() {
        let index = index_of(vec![
            vec![0.0, 1.0],  // orthogonal
            vec![1.0, 0.0],  // identical direction
            vec![1.0, 1.0],  // in between
        ]);
        let hits = rank(&[1.0, 0.0], &index, 3).unwrap();

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].index, 1);
        assert_eq!(hits[1].index, 2);
        assert_eq!(hits[2].index, 0);
        assert!(hits[0].score >= hits[1].score && hits[1].score >= hits[2].score);
    }

    #[test]
    fn test_equal_scores_tie_break_by_corpus_index() {
        // All candidates identical: every score ties, order must be 0,1,2,3.
        let index = index_of(vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0],
        ]);
        let hits = rank(&[1.0, 0.0], &index, 3).unwrap();
        let indices: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_k_larger_than_index_returns_full_index() {
        let index = index_of(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let hits = rank(&[1.0, 0.0], &index, 50).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_k_zero_returns_empty() {
        let index = index_of(vec![vec![1.0, 0.0]]);
        assert!(rank(&[1.0, 0.0], &index, 0).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let index = index_of(vec![vec![1.0, 0.0, 0.0]]);
        let err = rank(&[1.0, 0.0], &index, 1).unwrap_err();
        assert_eq!(err.expected, 3);
        assert_eq!(err.got, 2);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let index = index_of(vec![
            vec![0.3, 0.7],
            vec![0.7, 0.3],
            vec![0.5, 0.5],
            vec![0.5, 0.5],
        ]);
        let first = rank(&[0.6, 0.4], &index, 4).unwrap();
        let second = rank(&[0.6, 0.4], &index, 4).unwrap();
        assert_eq!(first, second);
    }
}
