//! Matcher — the semantic retrieval engine. Orchestrates corpus load →
//! embedding index build → query-time ranking behind one owned object that
//! is constructed at startup and injected into handlers by reference
//! (no module-level singleton).

pub mod corpus;
pub mod handlers;
pub mod index;
pub mod models;
pub mod ranker;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::embedder::{EmbedError, Embedder};
use crate::matcher::corpus::{Corpus, CorpusLoadError};
use crate::matcher::index::{EmbeddingBuildError, EmbeddingIndex};
use crate::matcher::models::MatchResult;
use crate::matcher::ranker::InvalidQueryError;

pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error(transparent)]
    CorpusLoad(#[from] CorpusLoadError),

    #[error(transparent)]
    EmbeddingBuild(#[from] EmbeddingBuildError),

    #[error(transparent)]
    InvalidQuery(#[from] InvalidQueryError),

    #[error("Matcher not ready: corpus and embedding index are not loaded yet")]
    NotReady,

    #[error("Query embedding failed: {0}")]
    Embed(#[from] EmbedError),
}

/// An immutable corpus + index pair. Shared read-only across concurrent
/// requests; replaced wholesale on reload, never mutated in place.
pub struct Snapshot {
    pub corpus: Corpus,
    pub index: EmbeddingIndex,
}

/// Summary returned by `load`, surfaced by the reload endpoint.
#[derive(Debug, Clone, Copy)]
pub struct LoadSummary {
    pub jobs: usize,
    pub dim: usize,
}

/// The matching engine. Holds the current snapshot behind an `RwLock`d
/// `Arc`: readers clone the `Arc` and work against a consistent pair, while
/// `load` builds a fresh snapshot off to the side and swaps it in whole.
pub struct Matcher {
    embedder: Arc<dyn Embedder>,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    embed_timeout: Duration,
}

impl Matcher {
    /// Creates an engine with no snapshot; `match_jobs` fails with
    /// `NotReady` until the first `load` completes.
    pub fn new(embedder: Arc<dyn Embedder>, embed_timeout: Duration) -> Self {
        Self {
            embedder,
            snapshot: RwLock::new(None),
            embed_timeout,
        }
    }

    /// Loads the corpus from `dataset` and builds its embedding index, then
    /// atomically replaces the current snapshot. Concurrent readers keep
    /// serving the old snapshot until the swap. Expensive; called once at
    /// startup and again only on administrative reload.
    pub async fn load(
        &self,
        dataset: &Path,
        batch_size: usize,
    ) -> Result<LoadSummary, MatcherError> {
        let corpus = Corpus::load_csv(dataset)?;
        let index = EmbeddingIndex::build(&corpus, self.embedder.as_ref(), batch_size).await?;

        let summary = LoadSummary {
            jobs: corpus.len(),
            dim: index.dim(),
        };

        let fresh = Arc::new(Snapshot { corpus, index });
        *self.snapshot.write().await = Some(fresh);

        info!(
            "Matcher ready: {} jobs indexed at dimension {}",
            summary.jobs, summary.dim
        );
        Ok(summary)
    }

    /// Current snapshot, or `NotReady` before the first load completes.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>, MatcherError> {
        self.snapshot
            .read()
            .await
            .clone()
            .ok_or(MatcherError::NotReady)
    }

    /// Finds the top-k jobs for a free-text query. Empty or whitespace-only
    /// queries return an empty list without invoking the embedding model.
    pub async fn match_jobs(
        &self,
        query_text: &str,
        k: usize,
    ) -> Result<Vec<MatchResult>, MatcherError> {
        let snapshot = self.snapshot().await?;

        if query_text.trim().is_empty() {
            warn!("empty query text provided");
            return Ok(Vec::new());
        }

        let query_vector = self.encode_query(query_text).await?;
        let hits = ranker::rank(&query_vector, &snapshot.index, k)?;

        Ok(hits
            .iter()
            .filter_map(|hit| {
                snapshot
                    .corpus
                    .get(hit.index)
                    .map(|record| MatchResult::from_record(record, hit.score))
            })
            .collect())
    }

    /// Encodes the query text, subject to the configured timeout — the
    /// model call is the potentially slow step; ranking itself is bounded.
    async fn encode_query(&self, query_text: &str) -> Result<Vec<f32>, MatcherError> {
        let batch = [query_text.to_string()];
        let mut vectors =
            match tokio::time::timeout(self.embed_timeout, self.embedder.encode_batch(&batch))
                .await
            {
                Ok(result) => result?,
                Err(_) => return Err(EmbedError::Timeout(self.embed_timeout).into()),
            };

        let got = vectors.len();
        match vectors.pop() {
            Some(v) if got == 1 => Ok(v),
            _ => Err(EmbedError::CountMismatch { expected: 1, got }.into()),
        }
    }
}
