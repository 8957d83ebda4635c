use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::cache::{AggregateCache, ScopeKey};
use super::models::ScoreEvent;
use super::repository::ScoreRepository;
use super::statistics::ScoreStatistics;
use crate::shared::AppError;
use crate::user::repository::UserRepository;

/// Service for leaderboard queries, average-score aggregation and score
/// submission.
///
/// Leaderboards always go to the repository: their composition changes on
/// every submission and stale rankings are immediately visible to players.
/// Averages are cache-first per scope, with submission invalidating exactly
/// the two scopes a new score affects (global and the submitting user).
pub struct ScoreService {
    score_repository: Arc<dyn ScoreRepository + Send + Sync>,
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<AggregateCache>,
}

impl ScoreService {
    pub fn new(
        score_repository: Arc<dyn ScoreRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<AggregateCache>,
    ) -> Self {
        Self {
            score_repository,
            user_repository,
            cache,
        }
    }

    /// Top `count` scores across all users, value descending, ties in
    /// insertion order. An empty result is valid, not an error.
    #[instrument(skip(self))]
    pub async fn top_scores(&self, count: usize) -> Result<Vec<ScoreEvent>, AppError> {
        self.score_repository.query_top_n(count).await
    }

    /// Top `count` scores for one user, same ordering as `top_scores`.
    #[instrument(skip(self))]
    pub async fn top_scores_by_user(
        &self,
        user_id: Uuid,
        count: usize,
    ) -> Result<Vec<ScoreEvent>, AppError> {
        self.score_repository.query_top_n_by_user(user_id, count).await
    }

    /// All score events for one user, unordered. Feeds the per-user average.
    #[instrument(skip(self))]
    pub async fn scores_by_user(&self, user_id: Uuid) -> Result<Vec<ScoreEvent>, AppError> {
        self.score_repository.query_by_user(user_id).await
    }

    /// Global average score, cache-first.
    #[instrument(skip(self))]
    pub async fn average_score(&self) -> Result<f64, AppError> {
        if let Some(cached) = self.cache.get(&ScopeKey::Global) {
            return Ok(cached);
        }

        let events = self.score_repository.query_all().await?;
        let average = Self::fold_average(&events);

        self.cache.set(ScopeKey::Global, average);
        debug!(average, samples = events.len(), "Global average recomputed");

        Ok(average)
    }

    /// One user's average score, cache-first on that user's scope.
    #[instrument(skip(self))]
    pub async fn average_score_by_user(&self, user_id: Uuid) -> Result<f64, AppError> {
        let scope = ScopeKey::User(user_id);
        if let Some(cached) = self.cache.get(&scope) {
            return Ok(cached);
        }

        let events = self.score_repository.query_by_user(user_id).await?;
        let average = Self::fold_average(&events);

        self.cache.set(scope, average);
        debug!(user_id = %user_id, average, samples = events.len(), "User average recomputed");

        Ok(average)
    }

    /// Persists a new score event and invalidates the two affected cache
    /// scopes.
    ///
    /// Invalidation happens after the insert has been accepted by the store
    /// and before this call returns, so the next average read for either
    /// scope recomputes against the new event. A reader racing the window
    /// between insert and invalidation may briefly repopulate a pre-write
    /// average; the invalidation that follows removes it, so staleness never
    /// outlives this call. No lock spans the two steps.
    #[instrument(skip(self))]
    pub async fn submit_score(&self, user_id: Uuid, value: i32) -> Result<ScoreEvent, AppError> {
        if value < 0 {
            return Err(AppError::Validation(
                "Score must be greater than or equal to 0".to_string(),
            ));
        }

        if !self.user_repository.exists(user_id).await? {
            return Err(AppError::UserNotFound { user_id });
        }

        let event = ScoreEvent::new(user_id, value);
        self.score_repository.insert(&event).await?;

        self.cache.invalidate(&ScopeKey::Global);
        self.cache.invalidate(&ScopeKey::User(user_id));

        info!(
            score_id = %event.id,
            user_id = %user_id,
            value,
            "Score submitted"
        );

        Ok(event)
    }

    fn fold_average(events: &[ScoreEvent]) -> f64 {
        let mut stats = ScoreStatistics::new();
        for event in events {
            stats.add_score(event.value);
        }
        stats.average_score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::repository::InMemoryScoreRepository;
    use crate::user::models::UserModel;
    use crate::user::repository::InMemoryUserRepository;

    fn service_with_user() -> (ScoreService, Uuid) {
        let user = UserModel::new("player".to_string(), "player@example.com".to_string());
        let user_id = user.id;
        let service = ScoreService::new(
            Arc::new(InMemoryScoreRepository::new()),
            Arc::new(InMemoryUserRepository::with_users(vec![user])),
            Arc::new(AggregateCache::new()),
        );
        (service, user_id)
    }

    #[tokio::test]
    async fn average_of_empty_store_is_zero() {
        let (service, _) = service_with_user();
        assert_eq!(service.average_score().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn submit_rejects_negative_score() {
        let (service, user_id) = service_with_user();
        let result = service.submit_score(user_id, -1).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn submit_rejects_unknown_user() {
        let (service, _) = service_with_user();
        let stranger = Uuid::new_v4();
        let result = service.submit_score(stranger, 10).await;
        assert!(matches!(
            result,
            Err(AppError::UserNotFound { user_id }) if user_id == stranger
        ));
    }

    #[tokio::test]
    async fn submission_invalidates_cached_averages() {
        let (service, user_id) = service_with_user();

        service.submit_score(user_id, 10).await.unwrap();
        assert_eq!(service.average_score().await.unwrap(), 10.0);
        assert_eq!(service.average_score_by_user(user_id).await.unwrap(), 10.0);

        // Both scopes are now cached; the next submission must refresh them
        service.submit_score(user_id, 30).await.unwrap();
        assert_eq!(service.average_score().await.unwrap(), 20.0);
        assert_eq!(service.average_score_by_user(user_id).await.unwrap(), 20.0);
    }

    #[tokio::test]
    async fn user_scope_is_isolated_from_other_users() {
        let alice = UserModel::new("alice".to_string(), "alice@example.com".to_string());
        let bob = UserModel::new("bob".to_string(), "bob@example.com".to_string());
        let (alice_id, bob_id) = (alice.id, bob.id);
        let service = ScoreService::new(
            Arc::new(InMemoryScoreRepository::new()),
            Arc::new(InMemoryUserRepository::with_users(vec![alice, bob])),
            Arc::new(AggregateCache::new()),
        );

        service.submit_score(alice_id, 100).await.unwrap();
        service.submit_score(bob_id, 200).await.unwrap();

        assert_eq!(service.average_score_by_user(alice_id).await.unwrap(), 100.0);
        assert_eq!(service.average_score_by_user(bob_id).await.unwrap(), 200.0);
        assert_eq!(service.average_score().await.unwrap(), 150.0);
    }

    #[tokio::test]
    async fn scores_by_user_returns_every_event() {
        let (service, user_id) = service_with_user();

        service.submit_score(user_id, 5).await.unwrap();
        service.submit_score(user_id, 15).await.unwrap();

        let events = service.scores_by_user(user_id).await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.user_id == user_id));
    }

    #[tokio::test]
    async fn leaderboard_orders_submissions_by_value() {
        let users: Vec<UserModel> = ["a", "b", "c"]
            .iter()
            .map(|n| UserModel::new(n.to_string(), format!("{}@example.com", n)))
            .collect();
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let service = ScoreService::new(
            Arc::new(InMemoryScoreRepository::new()),
            Arc::new(InMemoryUserRepository::with_users(users)),
            Arc::new(AggregateCache::new()),
        );

        service.submit_score(ids[0], 10).await.unwrap();
        service.submit_score(ids[1], 50).await.unwrap();
        service.submit_score(ids[2], 30).await.unwrap();

        let top = service.top_scores(2).await.unwrap();
        let values: Vec<i32> = top.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![50, 30]);
    }
}
