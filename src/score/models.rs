use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the scores table.
///
/// Append-only: events are inserted on submission and never updated or
/// deleted afterwards, which is what makes invalidate-on-write sufficient
/// for cache correctness.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub value: i32,
    pub created_at: DateTime<Utc>,
}

impl ScoreEvent {
    pub fn new(user_id: Uuid, value: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            value,
            created_at: Utc::now(),
        }
    }
}

/// Request payload for submitting a score
#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub user_id: Uuid,
    pub score: i32,
}

/// Response wrapper for average-score queries
#[derive(Debug, Serialize, Deserialize)]
pub struct AverageScoreResponse {
    pub average_score: f64,
}
