pub mod cache;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod statistics;

pub use cache::{AggregateCache, ScopeKey};
pub use models::ScoreEvent;
pub use repository::{InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository};
pub use service::ScoreService;
pub use statistics::ScoreStatistics;
