use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Cache partition identifier: the global average or one user's average.
///
/// Typed key in place of the ad-hoc strings ("AverageScore",
/// "AverageScore_<id>") this design replaces; collisions with other key
/// families are impossible by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    Global,
    User(Uuid),
}

/// Concurrent cache of computed average scores, partitioned by scope.
///
/// Backed by a sharded map so readers never see a torn write and writers to
/// different scopes do not contend. Entries carry no TTL: correctness relies
/// on explicit invalidation when a score lands in the scope, not on expiry.
/// Size is bounded in practice by the number of distinct users.
#[derive(Debug, Default)]
pub struct AggregateCache {
    entries: DashMap<ScopeKey, f64>,
}

impl AggregateCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, scope: &ScopeKey) -> Option<f64> {
        let value = self.entries.get(scope).map(|entry| *entry);
        debug!(scope = ?scope, hit = value.is_some(), "Aggregate cache lookup");
        value
    }

    pub fn set(&self, scope: ScopeKey, value: f64) {
        debug!(scope = ?scope, value, "Aggregate cache populated");
        self.entries.insert(scope, value);
    }

    /// Removes the entry for a scope. Idempotent: invalidating an absent
    /// scope is a no-op, which keeps retries after cancellation safe.
    pub fn invalidate(&self, scope: &ScopeKey) {
        let removed = self.entries.remove(scope).is_some();
        debug!(scope = ?scope, removed, "Aggregate cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
