use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::eligibility::{check_eligibility, PurchaseEligibility};
use super::models::{CreateWardrobeItemRequest, WardrobeItem};
use super::repository::WardrobeRepository;
use crate::shared::AppError;
use crate::user::repository::UserRepository;

/// Service for wardrobe item lookups and the rank/gold purchase gate.
pub struct WardrobeService {
    wardrobe_repository: Arc<dyn WardrobeRepository + Send + Sync>,
    user_repository: Arc<dyn UserRepository + Send + Sync>,
}

impl WardrobeService {
    pub fn new(
        wardrobe_repository: Arc<dyn WardrobeRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self {
            wardrobe_repository,
            user_repository,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<WardrobeItem>, AppError> {
        self.wardrobe_repository.list_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, item_id: Uuid) -> Result<WardrobeItem, AppError> {
        self.wardrobe_repository
            .find_by_id(item_id)
            .await?
            .ok_or(AppError::ItemNotFound { item_id })
    }

    #[instrument(skip(self))]
    pub async fn get_item_by_name(&self, name: &str) -> Result<Option<WardrobeItem>, AppError> {
        self.wardrobe_repository.find_by_name(name).await
    }

    #[instrument(skip(self, request))]
    pub async fn create_item(
        &self,
        request: CreateWardrobeItemRequest,
    ) -> Result<WardrobeItem, AppError> {
        if request.price < 0 {
            return Err(AppError::Validation(
                "Price must be greater than or equal to 0".to_string(),
            ));
        }

        let item = WardrobeItem::new(request.name, request.price, request.required_rank);
        self.wardrobe_repository.insert(&item).await?;

        info!(item_id = %item.id, name = %item.name, "Wardrobe item created");
        Ok(item)
    }

    /// Loads both snapshots and runs the pure eligibility check.
    ///
    /// Read-only: nothing is purchased or persisted here, so repeating the
    /// call always yields the same verdict for the same state.
    #[instrument(skip(self))]
    pub async fn check_purchase_eligibility(
        &self,
        user_id: Uuid,
        item_id: Uuid,
    ) -> Result<PurchaseEligibility, AppError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })?;

        let item = self.get_item(item_id).await?;

        Ok(check_eligibility(&user, &item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::models::UserModel;
    use crate::user::rank::Rank;
    use crate::user::repository::InMemoryUserRepository;
    use crate::wardrobe::repository::InMemoryWardrobeRepository;

    fn setup(user_gold: i32, user_rank: Rank, price: i32, required: Rank) -> (WardrobeService, Uuid, Uuid) {
        let mut user = UserModel::new("buyer".to_string(), "buyer@example.com".to_string());
        user.gold = user_gold;
        user.rank = user_rank;
        let item = WardrobeItem::new("cape".to_string(), price, required);
        let (user_id, item_id) = (user.id, item.id);

        let service = WardrobeService::new(
            Arc::new(InMemoryWardrobeRepository::with_items(vec![item])),
            Arc::new(InMemoryUserRepository::with_users(vec![user])),
        );
        (service, user_id, item_id)
    }

    #[tokio::test]
    async fn eligible_purchase_has_no_message() {
        let (service, user_id, item_id) = setup(100, Rank::Pro, 100, Rank::Noob);

        let verdict = service
            .check_purchase_eligibility(user_id, item_id)
            .await
            .unwrap();

        assert!(verdict.is_eligible());
        assert!(verdict.message.is_none());
    }

    #[tokio::test]
    async fn short_on_gold_mentions_gold() {
        let (service, user_id, item_id) = setup(50, Rank::Pro, 100, Rank::Noob);

        let verdict = service
            .check_purchase_eligibility(user_id, item_id)
            .await
            .unwrap();

        assert!(!verdict.has_sufficient_gold);
        assert_eq!(verdict.message.as_deref(), Some("Insufficient gold"));
    }

    #[tokio::test]
    async fn verdict_is_repeatable() {
        let (service, user_id, item_id) = setup(50, Rank::Noob, 100, Rank::Master);

        let first = service
            .check_purchase_eligibility(user_id, item_id)
            .await
            .unwrap();
        let second = service
            .check_purchase_eligibility(user_id, item_id)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_user_and_item_are_typed_errors() {
        let (service, user_id, item_id) = setup(0, Rank::None, 0, Rank::None);

        let no_user = service
            .check_purchase_eligibility(Uuid::new_v4(), item_id)
            .await;
        assert!(matches!(no_user, Err(AppError::UserNotFound { .. })));

        let no_item = service
            .check_purchase_eligibility(user_id, Uuid::new_v4())
            .await;
        assert!(matches!(no_item, Err(AppError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn item_lookup_by_name() {
        let (service, _, _) = setup(0, Rank::None, 0, Rank::None);

        let found = service.get_item_by_name("cape").await.unwrap();
        assert!(found.is_some());

        let missing = service.get_item_by_name("ghost-hat").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn create_item_rejects_negative_price() {
        let (service, _, _) = setup(0, Rank::None, 0, Rank::None);

        let result = service
            .create_item(CreateWardrobeItemRequest {
                name: "void-hat".to_string(),
                price: -1,
                required_rank: Rank::None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
