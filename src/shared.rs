use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::progression::XpPolicy;
use crate::score::cache::AggregateCache;
use crate::score::repository::ScoreRepository;
use crate::user::repository::UserRepository;
use crate::wardrobe::repository::WardrobeRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub score_repository: Arc<dyn ScoreRepository + Send + Sync>,
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub wardrobe_repository: Arc<dyn WardrobeRepository + Send + Sync>,
    pub aggregate_cache: Arc<AggregateCache>,
    pub xp_policy: XpPolicy,
}

impl AppState {
    pub fn new(
        score_repository: Arc<dyn ScoreRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        wardrobe_repository: Arc<dyn WardrobeRepository + Send + Sync>,
    ) -> Self {
        Self {
            score_repository,
            user_repository,
            wardrobe_repository,
            aggregate_cache: Arc::new(AggregateCache::new()),
            xp_policy: XpPolicy::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User {user_id} not found")]
    UserNotFound { user_id: Uuid },

    #[error("Wardrobe item {item_id} not found")]
    ItemNotFound { item_id: Uuid },

    #[error("User {user_id} has {current} XP but needs {required} XP to rank up")]
    InsufficientXp {
        user_id: Uuid,
        current: i32,
        required: i32,
    },

    #[error("User {user_id} already holds the highest rank")]
    MaxRankReached { user_id: Uuid },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::UserNotFound { user_id } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "User not found", "user_id": user_id }),
            ),
            AppError::ItemNotFound { item_id } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Item not found", "item_id": item_id }),
            ),
            AppError::InsufficientXp {
                user_id,
                current,
                required,
            } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "Insufficient XP",
                    "user_id": user_id,
                    "current_xp": current,
                    "required_xp": required,
                }),
            ),
            AppError::MaxRankReached { user_id } => (
                StatusCode::CONFLICT,
                json!({ "error": "Maximum rank reached", "user_id": user_id }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("Database error: {}", msg) }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
