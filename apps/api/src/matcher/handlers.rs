use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matcher::models::{JobRecord, MatchResult};
use crate::matcher::DEFAULT_TOP_K;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub job_matches: Vec<MatchResult>,
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let job_matches = state.matcher.match_jobs(&req.resume_text, req.top_k).await?;
    Ok(Json(MatchResponse { job_matches }))
}

#[derive(Deserialize)]
pub struct JobsQuery {
    pub company: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    #[serde(default = "default_jobs_limit")]
    pub limit: usize,
}

fn default_jobs_limit() -> usize {
    20
}

/// GET /api/v1/jobs — filtered listing over the deduplicated corpus.
/// Filters are case-insensitive substring matches, as in the original API.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobsQuery>,
) -> Result<Json<Vec<JobRecord>>, AppError> {
    let snapshot = state.matcher.snapshot().await?;

    let jobs: Vec<JobRecord> = snapshot
        .corpus
        .records()
        .iter()
        .filter(|job| {
            field_contains(&job.company, params.company.as_deref())
                && field_contains(&job.category, params.category.as_deref())
                && field_contains(&job.location, params.location.as_deref())
        })
        .take(params.limit)
        .cloned()
        .collect();

    Ok(Json(jobs))
}

fn field_contains(field: &Option<String>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => field
            .as_deref()
            .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub message: String,
    pub jobs_count: usize,
}

/// POST /api/v1/reload — administrative rebuild of corpus + index from the
/// configured dataset. Atomic from the reader's perspective: in-flight
/// requests finish against the old snapshot.
pub async fn handle_reload(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let summary = state
        .matcher
        .load(&state.config.dataset_path, state.config.embed_batch_size)
        .await?;

    info!("Dataset reloaded: {} jobs", summary.jobs);
    Ok(Json(ReloadResponse {
        message: "Job dataset reloaded successfully".to_string(),
        jobs_count: summary.jobs,
    }))
}
