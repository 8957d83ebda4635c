use std::sync::Arc;

use ledgerboard::progression::ProgressionService;
use ledgerboard::score::repository::InMemoryScoreRepository;
use ledgerboard::score::ScoreService;
use ledgerboard::shared::AppError;
use ledgerboard::user::repository::InMemoryUserRepository;
use ledgerboard::user::{Rank, UserModel};
use ledgerboard::wardrobe::repository::InMemoryWardrobeRepository;
use ledgerboard::wardrobe::{WardrobeItem, WardrobeService};
use ledgerboard::{AggregateCache, XpPolicy};

/// Everything a workflow test needs, wired over in-memory repositories.
pub struct TestBackend {
    pub score_repository: Arc<InMemoryScoreRepository>,
    pub user_repository: Arc<InMemoryUserRepository>,
    pub wardrobe_repository: Arc<InMemoryWardrobeRepository>,
    pub cache: Arc<AggregateCache>,
    pub scores: ScoreService,
    pub progression: ProgressionService,
    pub wardrobe: WardrobeService,
}

impl TestBackend {
    pub fn new(users: Vec<UserModel>, items: Vec<WardrobeItem>) -> Self {
        let score_repository = Arc::new(InMemoryScoreRepository::new());
        let user_repository = Arc::new(InMemoryUserRepository::with_users(users));
        let wardrobe_repository = Arc::new(InMemoryWardrobeRepository::with_items(items));
        let cache = Arc::new(AggregateCache::new());

        let scores = ScoreService::new(
            score_repository.clone(),
            user_repository.clone(),
            cache.clone(),
        );
        let progression = ProgressionService::new(user_repository.clone(), XpPolicy::default());
        let wardrobe = WardrobeService::new(wardrobe_repository.clone(), user_repository.clone());

        Self {
            score_repository,
            user_repository,
            wardrobe_repository,
            cache,
            scores,
            progression,
            wardrobe,
        }
    }

    pub async fn stored_user(&self, user_id: uuid::Uuid) -> Result<UserModel, AppError> {
        use ledgerboard::user::UserRepository;
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })
    }
}

pub fn user_named(name: &str) -> UserModel {
    UserModel::new(name.to_string(), format!("{}@example.com", name))
}

pub fn user_at(name: &str, rank: Rank, xp: i32, gold: i32) -> UserModel {
    let mut user = user_named(name);
    user.rank = rank;
    user.xp = xp;
    user.gold = gold;
    user
}
