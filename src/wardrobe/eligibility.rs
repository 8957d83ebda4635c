use serde::{Deserialize, Serialize};

use super::models::WardrobeItem;
use crate::user::models::UserModel;

const MSG_GOLD_AND_RANK: &str = "Insufficient gold and rank";
const MSG_GOLD: &str = "Insufficient gold";
const MSG_RANK: &str = "Insufficient rank";

/// Verdict of a purchase-eligibility check.
///
/// Both flags plus an optional fixed reason string; overall eligibility is
/// derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseEligibility {
    pub has_sufficient_gold: bool,
    pub meets_rank_requirement: bool,
    pub message: Option<String>,
}

impl PurchaseEligibility {
    pub fn is_eligible(&self) -> bool {
        self.has_sufficient_gold && self.meets_rank_requirement
    }
}

/// Pure eligibility check over two already-loaded snapshots.
///
/// Gold passes at equality (a 100-gold item is buyable with exactly 100
/// gold), and rank comparison uses the Rank total order, so any rank at or
/// above the item's requirement qualifies.
pub fn check_eligibility(user: &UserModel, item: &WardrobeItem) -> PurchaseEligibility {
    let has_sufficient_gold = user.gold >= item.price;
    let meets_rank_requirement = user.rank >= item.required_rank;

    let message = match (has_sufficient_gold, meets_rank_requirement) {
        (false, false) => Some(MSG_GOLD_AND_RANK.to_string()),
        (false, true) => Some(MSG_GOLD.to_string()),
        (true, false) => Some(MSG_RANK.to_string()),
        (true, true) => None,
    };

    PurchaseEligibility {
        has_sufficient_gold,
        meets_rank_requirement,
        message,
    }
}
