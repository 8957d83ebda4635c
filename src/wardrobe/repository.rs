use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::WardrobeItem;
use crate::shared::AppError;

/// Trait for wardrobe item persistence operations
#[async_trait]
pub trait WardrobeRepository: Send + Sync {
    async fn find_by_id(&self, item_id: Uuid) -> Result<Option<WardrobeItem>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<WardrobeItem>, AppError>;
    async fn list_all(&self) -> Result<Vec<WardrobeItem>, AppError>;
    async fn insert(&self, item: &WardrobeItem) -> Result<(), AppError>;
}

/// In-memory implementation of WardrobeRepository for development and testing
pub struct InMemoryWardrobeRepository {
    items: Mutex<HashMap<Uuid, WardrobeItem>>,
}

impl Default for InMemoryWardrobeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWardrobeRepository {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated items
    pub fn with_items(items: Vec<WardrobeItem>) -> Self {
        let mut item_map = HashMap::new();
        for item in items {
            item_map.insert(item.id, item);
        }

        Self {
            items: Mutex::new(item_map),
        }
    }
}

#[async_trait]
impl WardrobeRepository for InMemoryWardrobeRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, item_id: Uuid) -> Result<Option<WardrobeItem>, AppError> {
        let items = self.items.lock().unwrap();
        Ok(items.get(&item_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<WardrobeItem>, AppError> {
        let items = self.items.lock().unwrap();
        Ok(items.values().find(|item| item.name == name).cloned())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<WardrobeItem>, AppError> {
        let items = self.items.lock().unwrap();
        Ok(items.values().cloned().collect())
    }

    #[instrument(skip(self, item))]
    async fn insert(&self, item: &WardrobeItem) -> Result<(), AppError> {
        debug!(item_id = %item.id, name = %item.name, "Storing wardrobe item in memory");

        let mut items = self.items.lock().unwrap();
        items.insert(item.id, item.clone());
        Ok(())
    }
}

/// PostgreSQL implementation of WardrobeRepository
pub struct PostgresWardrobeRepository {
    pool: PgPool,
}

impl PostgresWardrobeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WardrobeRepository for PostgresWardrobeRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, item_id: Uuid) -> Result<Option<WardrobeItem>, AppError> {
        sqlx::query_as::<_, WardrobeItem>(
            "SELECT id, name, price, required_rank FROM wardrobe_items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, item_id = %item_id, "Failed to fetch wardrobe item");
            AppError::Database(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<WardrobeItem>, AppError> {
        sqlx::query_as::<_, WardrobeItem>(
            "SELECT id, name, price, required_rank FROM wardrobe_items WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, name = %name, "Failed to fetch wardrobe item by name");
            AppError::Database(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<WardrobeItem>, AppError> {
        sqlx::query_as::<_, WardrobeItem>(
            "SELECT id, name, price, required_rank FROM wardrobe_items",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list wardrobe items");
            AppError::Database(e.to_string())
        })
    }

    #[instrument(skip(self, item))]
    async fn insert(&self, item: &WardrobeItem) -> Result<(), AppError> {
        debug!(item_id = %item.id, name = %item.name, "Storing wardrobe item in database");

        sqlx::query(
            "INSERT INTO wardrobe_items (id, name, price, required_rank) VALUES ($1, $2, $3, $4)",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.required_rank)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, item_id = %item.id, "Failed to store wardrobe item");
            AppError::Database(e.to_string())
        })?;

        Ok(())
    }
}
