use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::policy::XpPolicy;
use crate::shared::AppError;
use crate::user::rank::Rank;
use crate::user::repository::UserRepository;

/// Service owning the rank-up state machine and reward bookkeeping.
///
/// Rank only ever moves forward, and only when the user's XP covers the
/// policy's cost for their current rank. Rewards never trigger a rank-up by
/// themselves; callers decide when to attempt one.
pub struct ProgressionService {
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    policy: XpPolicy,
}

impl ProgressionService {
    pub fn new(user_repository: Arc<dyn UserRepository + Send + Sync>, policy: XpPolicy) -> Self {
        Self {
            user_repository,
            policy,
        }
    }

    /// XP the user needs to reach their next rank.
    #[instrument(skip(self))]
    pub async fn required_xp_for_rank_up(&self, user_id: Uuid) -> Result<i32, AppError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })?;

        self.policy
            .required_xp(user.rank)
            .ok_or(AppError::MaxRankReached { user_id })
    }

    /// Attempts to advance the user one rank.
    ///
    /// On success the XP cost is deducted and the rank advanced in a single
    /// versioned save, so a concurrent mutation of the same user surfaces as
    /// a conflict instead of a lost update. Failure leaves the user
    /// untouched.
    #[instrument(skip(self))]
    pub async fn attempt_rank_up(&self, user_id: Uuid) -> Result<Rank, AppError> {
        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })?;

        let required = self
            .policy
            .required_xp(user.rank)
            .ok_or(AppError::MaxRankReached { user_id })?;

        if user.xp < required {
            warn!(
                user_id = %user_id,
                current_xp = user.xp,
                required_xp = required,
                "Rank-up rejected: insufficient XP"
            );
            return Err(AppError::InsufficientXp {
                user_id,
                current: user.xp,
                required,
            });
        }

        // successor() is Some here: required_xp was Some, so rank is non-terminal
        let new_rank = user.rank.successor().ok_or(AppError::MaxRankReached { user_id })?;
        user.xp -= required;
        user.rank = new_rank;
        self.user_repository.save(&user).await?;

        info!(
            user_id = %user_id,
            new_rank = %new_rank,
            remaining_xp = user.xp,
            "Rank-up applied"
        );

        Ok(new_rank)
    }

    /// Adds a gold and XP reward to the user in one versioned save.
    ///
    /// Negative XP is rejected; negative gold is allowed so callers can
    /// express deductions. Never rank-ups implicitly.
    #[instrument(skip(self))]
    pub async fn reward_gold_and_xp(
        &self,
        user_id: Uuid,
        gold: i32,
        xp: i32,
    ) -> Result<(), AppError> {
        if xp < 0 {
            return Err(AppError::Validation(
                "XP reward must be greater than or equal to 0".to_string(),
            ));
        }

        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })?;

        user.gold = user.gold.saturating_add(gold).max(0);
        user.xp = user.xp.saturating_add(xp);
        self.user_repository.save(&user).await?;

        info!(
            user_id = %user_id,
            gold_delta = gold,
            xp_delta = xp,
            "Reward applied"
        );

        Ok(())
    }
}
