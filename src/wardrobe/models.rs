use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::rank::Rank;

/// Database model for the wardrobe_items table.
///
/// Items are read-only inputs to the eligibility check once created.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WardrobeItem {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub required_rank: Rank,
}

impl WardrobeItem {
    pub fn new(name: String, price: i32, required_rank: Rank) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            price,
            required_rank,
        }
    }
}

/// Request payload for creating a wardrobe item
#[derive(Debug, Deserialize)]
pub struct CreateWardrobeItemRequest {
    pub name: String,
    pub price: i32,
    pub required_rank: Rank,
}
