use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::rank::Rank;

/// Database model for the users table.
///
/// `version` is the optimistic concurrency token: every successful save bumps
/// it by one, and a save against a stale version is rejected so concurrent
/// read-modify-write cycles on xp/gold/rank never lose an update.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub rank: Rank,
    pub xp: i32,
    pub gold: i32,
    pub version: i64,
}

impl UserModel {
    /// Creates a fresh user at the starting rank with zero XP and gold.
    pub fn new(display_name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name,
            email,
            rank: Rank::default(),
            xp: 0,
            gold: 0,
            version: 0,
        }
    }
}

/// Public view of a user returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub rank: Rank,
    pub xp: i32,
    pub gold: i32,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            rank: user.rank,
            xp: user.xp,
            gold: user.gold,
        }
    }
}
