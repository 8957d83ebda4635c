use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user persistence operations
///
/// `save` carries the optimistic concurrency contract: it persists the given
/// snapshot only if the stored row still has the snapshot's version, bumping
/// the version on success and failing with `AppError::Conflict` otherwise.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError>;
    async fn exists(&self, user_id: Uuid) -> Result<bool, AppError>;
    async fn insert(&self, user: &UserModel) -> Result<(), AppError>;
    async fn save(&self, user: &UserModel) -> Result<(), AppError>;
}

/// In-memory implementation of UserRepository for development and testing
///
/// The version check runs under the same lock as the write, so it gives the
/// same no-lost-update guarantee as the database implementation.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        let mut user_map = HashMap::new();
        for user in users {
            user_map.insert(user.id, user);
        }

        Self {
            users: Mutex::new(user_map),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError> {
        let users = self.users.lock().unwrap();
        let user = users.get(&user_id).cloned();

        match &user {
            Some(u) => debug!(user_id = %user_id, rank = %u.rank, "User found in memory"),
            None => debug!(user_id = %user_id, "User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn exists(&self, user_id: Uuid) -> Result<bool, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.contains_key(&user_id))
    }

    #[instrument(skip(self, user))]
    async fn insert(&self, user: &UserModel) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User already exists in memory");
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        users.insert(user.id, user.clone());

        debug!(user_id = %user.id, "User created in memory");
        Ok(())
    }

    #[instrument(skip(self, user))]
    async fn save(&self, user: &UserModel) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .get_mut(&user.id)
            .ok_or(AppError::UserNotFound { user_id: user.id })?;

        if stored.version != user.version {
            warn!(
                user_id = %user.id,
                expected_version = user.version,
                stored_version = stored.version,
                "Stale user save rejected"
            );
            return Err(AppError::Conflict(
                "User was modified concurrently".to_string(),
            ));
        }

        let mut updated = user.clone();
        updated.version += 1;
        *stored = updated;

        debug!(user_id = %user.id, "User saved in memory");
        Ok(())
    }
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError> {
        debug!(user_id = %user_id, "Fetching user from database");

        let user = sqlx::query_as::<_, UserModel>(
            "SELECT id, display_name, email, rank, xp, gold, version FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch user from database");
            AppError::Database(e.to_string())
        })?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn exists(&self, user_id: Uuid) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, user_id = %user_id, "Failed to check user existence");
                    AppError::Database(e.to_string())
                })?;

        Ok(exists)
    }

    #[instrument(skip(self, user))]
    async fn insert(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, "Creating user in database");

        sqlx::query(
            "INSERT INTO users (id, display_name, email, rank, xp, gold, version) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(user.rank)
        .bind(user.xp)
        .bind(user.gold)
        .bind(user.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user.id, "Failed to create user in database");
            AppError::Database(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self, user))]
    async fn save(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, version = user.version, "Saving user to database");

        let result = sqlx::query(
            "UPDATE users SET rank = $1, xp = $2, gold = $3, version = version + 1 \
             WHERE id = $4 AND version = $5",
        )
        .bind(user.rank)
        .bind(user.xp)
        .bind(user.gold)
        .bind(user.id)
        .bind(user.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user.id, "Failed to save user to database");
            AppError::Database(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(user_id = %user.id, version = user.version, "Stale user save rejected");
            return Err(AppError::Conflict(
                "User was modified concurrently".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::rank::Rank;

    fn sample_user(name: &str) -> UserModel {
        UserModel::new(name.to_string(), format!("{}@example.com", name))
    }

    #[tokio::test]
    async fn inserts_and_finds_user() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user("alice");

        repo.insert(&user).await.unwrap();

        let found = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.display_name, "alice");
        assert_eq!(found.rank, Rank::None);
        assert!(repo.exists(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn save_bumps_version() {
        let repo = InMemoryUserRepository::new();
        let mut user = sample_user("bob");
        repo.insert(&user).await.unwrap();

        user.gold = 50;
        repo.save(&user).await.unwrap();

        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.gold, 50);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn stale_save_is_rejected() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user("carol");
        repo.insert(&user).await.unwrap();

        // First writer wins
        let mut first = repo.find_by_id(user.id).await.unwrap().unwrap();
        let mut second = repo.find_by_id(user.id).await.unwrap().unwrap();

        first.gold += 10;
        repo.save(&first).await.unwrap();

        second.gold += 20;
        let result = repo.save(&second).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // The first update is intact
        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.gold, 10);
    }

    #[tokio::test]
    async fn missing_user_save_reports_not_found() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user("dave");

        let result = repo.save(&user).await;
        assert!(matches!(result, Err(AppError::UserNotFound { .. })));
    }
}
