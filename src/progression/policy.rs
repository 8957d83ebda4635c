use crate::user::rank::Rank;

/// XP cost curve for rank-ups.
///
/// The cost of leaving rank `r` (ordinal) is `base * r^3`, plus
/// `parity_bonus` when `r` is odd, floored at `base` so every non-terminal
/// rank has a strictly positive cost. The curve is a policy value rather
/// than a hard-coded formula so deployments can tune it without touching
/// the state machine.
#[derive(Debug, Clone, Copy)]
pub struct XpPolicy {
    pub base: i32,
    pub parity_bonus: i32,
}

impl Default for XpPolicy {
    fn default() -> Self {
        Self {
            base: 125,
            parity_bonus: 125,
        }
    }
}

impl XpPolicy {
    /// XP needed to advance past `rank`, or `None` at the terminal rank.
    pub fn required_xp(&self, rank: Rank) -> Option<i32> {
        if rank.is_terminal() {
            return None;
        }

        let ordinal = rank.ordinal();
        let mut required = self.base.saturating_mul(cube(ordinal));
        if ordinal % 2 != 0 {
            required = required.saturating_add(self.parity_bonus);
        }

        Some(required.max(self.base))
    }
}

/// Integer cube, written out so the exponentiation cannot be misread as XOR.
fn cube(n: i32) -> i32 {
    n.saturating_mul(n).saturating_mul(n)
}
