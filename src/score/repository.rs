use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::ScoreEvent;
use crate::shared::AppError;

/// Trait for score persistence operations
///
/// The top-N queries own the leaderboard ordering contract: value descending,
/// ties broken by insertion order.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn insert(&self, event: &ScoreEvent) -> Result<(), AppError>;
    async fn query_all(&self) -> Result<Vec<ScoreEvent>, AppError>;
    async fn query_by_user(&self, user_id: Uuid) -> Result<Vec<ScoreEvent>, AppError>;
    async fn query_top_n(&self, n: usize) -> Result<Vec<ScoreEvent>, AppError>;
    async fn query_top_n_by_user(
        &self,
        user_id: Uuid,
        n: usize,
    ) -> Result<Vec<ScoreEvent>, AppError>;
}

/// In-memory implementation of ScoreRepository for development and testing
///
/// Events are kept in insertion order; top-N uses a stable sort so ties keep
/// that order, matching the database implementation's created_at tie-break.
pub struct InMemoryScoreRepository {
    events: Mutex<Vec<ScoreEvent>>,
}

impl Default for InMemoryScoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    #[instrument(skip(self, event))]
    async fn insert(&self, event: &ScoreEvent) -> Result<(), AppError> {
        debug!(score_id = %event.id, user_id = %event.user_id, value = event.value, "Storing score in memory");

        let mut events = self.events.lock().unwrap();
        events.push(event.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn query_all(&self) -> Result<Vec<ScoreEvent>, AppError> {
        let events = self.events.lock().unwrap();
        Ok(events.clone())
    }

    #[instrument(skip(self))]
    async fn query_by_user(&self, user_id: Uuid) -> Result<Vec<ScoreEvent>, AppError> {
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|event| event.user_id == user_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn query_top_n(&self, n: usize) -> Result<Vec<ScoreEvent>, AppError> {
        let events = self.events.lock().unwrap();
        let mut sorted = events.clone();
        // Vec::sort_by is stable, so equal values stay in insertion order
        sorted.sort_by(|a, b| b.value.cmp(&a.value));
        sorted.truncate(n);
        Ok(sorted)
    }

    #[instrument(skip(self))]
    async fn query_top_n_by_user(
        &self,
        user_id: Uuid,
        n: usize,
    ) -> Result<Vec<ScoreEvent>, AppError> {
        let events = self.events.lock().unwrap();
        let mut sorted: Vec<ScoreEvent> = events
            .iter()
            .filter(|event| event.user_id == user_id)
            .cloned()
            .collect();
        sorted.sort_by(|a, b| b.value.cmp(&a.value));
        sorted.truncate(n);
        Ok(sorted)
    }
}

/// PostgreSQL implementation of ScoreRepository
pub struct PostgresScoreRepository {
    pool: PgPool,
}

impl PostgresScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreRepository for PostgresScoreRepository {
    #[instrument(skip(self, event))]
    async fn insert(&self, event: &ScoreEvent) -> Result<(), AppError> {
        debug!(score_id = %event.id, user_id = %event.user_id, "Storing score in database");

        sqlx::query(
            "INSERT INTO scores (id, user_id, value, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(event.value)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, score_id = %event.id, "Failed to store score in database");
            AppError::Database(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn query_all(&self) -> Result<Vec<ScoreEvent>, AppError> {
        sqlx::query_as::<_, ScoreEvent>("SELECT id, user_id, value, created_at FROM scores")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch scores from database");
                AppError::Database(e.to_string())
            })
    }

    #[instrument(skip(self))]
    async fn query_by_user(&self, user_id: Uuid) -> Result<Vec<ScoreEvent>, AppError> {
        sqlx::query_as::<_, ScoreEvent>(
            "SELECT id, user_id, value, created_at FROM scores WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch user scores from database");
            AppError::Database(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn query_top_n(&self, n: usize) -> Result<Vec<ScoreEvent>, AppError> {
        sqlx::query_as::<_, ScoreEvent>(
            "SELECT id, user_id, value, created_at FROM scores \
             ORDER BY value DESC, created_at ASC LIMIT $1",
        )
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch top scores from database");
            AppError::Database(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn query_top_n_by_user(
        &self,
        user_id: Uuid,
        n: usize,
    ) -> Result<Vec<ScoreEvent>, AppError> {
        sqlx::query_as::<_, ScoreEvent>(
            "SELECT id, user_id, value, created_at FROM scores WHERE user_id = $1 \
             ORDER BY value DESC, created_at ASC LIMIT $2",
        )
        .bind(user_id)
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch user top scores from database");
            AppError::Database(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn top_n_orders_by_value_descending() {
        let repo = InMemoryScoreRepository::new();
        let users: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        repo.insert(&ScoreEvent::new(users[0], 10)).await.unwrap();
        repo.insert(&ScoreEvent::new(users[1], 50)).await.unwrap();
        repo.insert(&ScoreEvent::new(users[2], 30)).await.unwrap();

        let top = repo.query_top_n(2).await.unwrap();
        let values: Vec<i32> = top.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![50, 30]);
    }

    #[tokio::test]
    async fn top_n_ties_keep_insertion_order() {
        let repo = InMemoryScoreRepository::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        repo.insert(&ScoreEvent::new(first, 40)).await.unwrap();
        repo.insert(&ScoreEvent::new(second, 40)).await.unwrap();

        let top = repo.query_top_n(2).await.unwrap();
        assert_eq!(top[0].user_id, first);
        assert_eq!(top[1].user_id, second);
    }

    #[tokio::test]
    async fn query_by_user_filters_events() {
        let repo = InMemoryScoreRepository::new();
        let target = Uuid::new_v4();
        let other = Uuid::new_v4();

        repo.insert(&ScoreEvent::new(target, 5)).await.unwrap();
        repo.insert(&ScoreEvent::new(other, 7)).await.unwrap();
        repo.insert(&ScoreEvent::new(target, 9)).await.unwrap();

        let events = repo.query_by_user(target).await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.user_id == target));
    }

    #[tokio::test]
    async fn top_n_of_empty_store_is_empty() {
        let repo = InMemoryScoreRepository::new();
        let top = repo.query_top_n(5).await.unwrap();
        assert!(top.is_empty());
    }
}
