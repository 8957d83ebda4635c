use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, FromRepr};

/// Player progression tier, ordered from lowest to highest.
///
/// New users start at `None`. `Admin` is terminal: it has no successor and
/// any further rank-up attempt is rejected rather than silently ignored.
/// Stored in the database as its integer ordinal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    FromRepr,
    sqlx::Type,
)]
#[repr(i32)]
pub enum Rank {
    None = 0,
    Noob = 1,
    Pro = 2,
    Master = 3,
    God = 4,
    Admin = 5,
}

impl Rank {
    /// The next rank up, or `None` when already at the terminal rank.
    pub fn successor(self) -> Option<Rank> {
        Rank::from_repr(self as i32 + 1)
    }

    /// Position in the progression order, used by the XP curve.
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::None
    }
}
