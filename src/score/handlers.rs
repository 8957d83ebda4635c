use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::models::{AverageScoreResponse, ScoreEvent, SubmitScoreRequest};
use super::service::ScoreService;
use crate::shared::{AppError, AppState};

const DEFAULT_LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub count: Option<i64>,
}

fn leaderboard_count(query: &LeaderboardQuery) -> Result<usize, AppError> {
    match query.count {
        None => Ok(DEFAULT_LEADERBOARD_SIZE),
        Some(count) if count > 0 => Ok(count as usize),
        Some(_) => Err(AppError::Validation(
            "Count must be greater than 0".to_string(),
        )),
    }
}

fn score_service(state: &AppState) -> ScoreService {
    ScoreService::new(
        Arc::clone(&state.score_repository),
        Arc::clone(&state.user_repository),
        Arc::clone(&state.aggregate_cache),
    )
}

/// HTTP handler for the global leaderboard
///
/// GET /api/leaderboard?count=N
/// An empty leaderboard maps to 404, matching the public API contract.
#[instrument(name = "get_top_scores", skip(state))]
pub async fn get_top_scores(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<ScoreEvent>>, AppError> {
    let count = leaderboard_count(&query)?;
    let scores = score_service(&state).top_scores(count).await?;

    if scores.is_empty() {
        return Err(AppError::NotFound("No scores recorded yet".to_string()));
    }

    info!(count = scores.len(), "Leaderboard served");
    Ok(Json(scores))
}

/// HTTP handler for one user's leaderboard
///
/// GET /api/leaderboard/:user_id?count=N
#[instrument(name = "get_top_scores_by_user", skip(state))]
pub async fn get_top_scores_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<ScoreEvent>>, AppError> {
    let count = leaderboard_count(&query)?;
    let scores = score_service(&state)
        .top_scores_by_user(user_id, count)
        .await?;

    if scores.is_empty() {
        return Err(AppError::NotFound(format!(
            "No scores recorded for user {}",
            user_id
        )));
    }

    info!(user_id = %user_id, count = scores.len(), "User leaderboard served");
    Ok(Json(scores))
}

/// HTTP handler for submitting a score
///
/// POST /api/leaderboard/create
#[instrument(name = "submit_score", skip(state, request))]
pub async fn submit_score(
    State(state): State<AppState>,
    Json(request): Json<SubmitScoreRequest>,
) -> Result<(StatusCode, Json<ScoreEvent>), AppError> {
    let event = score_service(&state)
        .submit_score(request.user_id, request.score)
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// HTTP handler for the global average score
///
/// GET /api/leaderboard/average
#[instrument(name = "get_average_score", skip(state))]
pub async fn get_average_score(
    State(state): State<AppState>,
) -> Result<Json<AverageScoreResponse>, AppError> {
    let average_score = score_service(&state).average_score().await?;
    Ok(Json(AverageScoreResponse { average_score }))
}

/// HTTP handler for one user's average score
///
/// GET /api/leaderboard/average/:user_id
#[instrument(name = "get_average_score_by_user", skip(state))]
pub async fn get_average_score_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AverageScoreResponse>, AppError> {
    let average_score = score_service(&state).average_score_by_user(user_id).await?;
    Ok(Json(AverageScoreResponse { average_score }))
}
