// Library crate for the score aggregation and progression backend
// This file exposes the public API for integration tests

pub mod progression;
pub mod score;
pub mod shared;
pub mod user;
pub mod wardrobe;

// Re-export commonly used types for easier access in tests
pub use progression::{ProgressionService, XpPolicy};
pub use score::{AggregateCache, ScopeKey, ScoreEvent, ScoreService, ScoreStatistics};
pub use shared::{AppError, AppState};
pub use user::{Rank, UserModel, UserRepository};
pub use wardrobe::{PurchaseEligibility, WardrobeItem, WardrobeService};
