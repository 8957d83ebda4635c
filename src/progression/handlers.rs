use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::service::ProgressionService;
use crate::shared::{AppError, AppState};
use crate::user::rank::Rank;

#[derive(Debug, Deserialize)]
pub struct RewardRequest {
    pub gold: i32,
    pub xp: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankUpResponse {
    pub user_id: Uuid,
    pub new_rank: Rank,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequiredXpResponse {
    pub user_id: Uuid,
    pub required_xp: i32,
}

fn progression_service(state: &AppState) -> ProgressionService {
    ProgressionService::new(Arc::clone(&state.user_repository), state.xp_policy)
}

/// HTTP handler for the XP cost of the user's next rank
///
/// GET /api/user/:user_id/next-rank-xp
#[instrument(name = "get_required_xp", skip(state))]
pub async fn get_required_xp(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RequiredXpResponse>, AppError> {
    let required_xp = progression_service(&state)
        .required_xp_for_rank_up(user_id)
        .await?;

    Ok(Json(RequiredXpResponse {
        user_id,
        required_xp,
    }))
}

/// HTTP handler for attempting a rank-up
///
/// POST /api/user/:user_id/rankup
#[instrument(name = "attempt_rank_up", skip(state))]
pub async fn attempt_rank_up(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RankUpResponse>, AppError> {
    let new_rank = progression_service(&state).attempt_rank_up(user_id).await?;

    Ok(Json(RankUpResponse { user_id, new_rank }))
}

/// HTTP handler for granting a gold/XP reward
///
/// POST /api/user/:user_id/reward
#[instrument(name = "reward_user", skip(state, request))]
pub async fn reward_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<RewardRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    progression_service(&state)
        .reward_gold_and_xp(user_id, request.gold, request.xp)
        .await?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}
