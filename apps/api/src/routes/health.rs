use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

/// GET /health
/// 503 until the corpus and embedding index are loaded, then a status
/// object with the indexed job count.
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let snapshot = state.matcher.snapshot().await?;

    Ok(Json(json!({
        "status": "ok",
        "service": "job-matcher-api",
        "jobs": snapshot.corpus.len(),
        "embedding_dim": snapshot.index.dim(),
    })))
}
