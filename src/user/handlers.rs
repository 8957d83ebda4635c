use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::models::UserResponse;
use crate::shared::{AppError, AppState};

/// HTTP handler for fetching a single user
///
/// GET /api/user/:user_id
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound { user_id })?;

    info!(user_id = %user_id, rank = %user.rank, "User fetched");

    Ok(Json(user.into()))
}
