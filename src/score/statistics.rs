/// Running aggregator for score values.
///
/// Plain value type: each average query folds the relevant score events
/// through a fresh instance, so there is no shared state to protect. The sum
/// is kept as i64 so a large number of i32 scores cannot overflow it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreStatistics {
    sum: i64,
    count: u64,
}

impl ScoreStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_score(&mut self, value: i32) {
        self.sum += i64::from(value);
        self.count += 1;
    }

    /// Mean of the accumulated scores, or exactly 0.0 when nothing has been
    /// added. Zero samples is a valid state, never an error or NaN.
    pub fn average_score(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum as f64 / self.count as f64
    }

    pub fn score_count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_statistics_average_is_zero() {
        let stats = ScoreStatistics::new();
        assert_eq!(stats.average_score(), 0.0);
        assert_eq!(stats.score_count(), 0);
    }

    #[test]
    fn computes_mean_of_added_scores() {
        let mut stats = ScoreStatistics::new();
        stats.add_score(10);
        stats.add_score(50);
        stats.add_score(30);

        assert_eq!(stats.score_count(), 3);
        assert_eq!(stats.average_score(), 30.0);
    }

    #[test]
    fn fractional_averages_are_exact() {
        let mut stats = ScoreStatistics::new();
        stats.add_score(1);
        stats.add_score(2);

        assert_eq!(stats.average_score(), 1.5);
    }

    #[test]
    fn large_sums_do_not_overflow() {
        let mut stats = ScoreStatistics::new();
        for _ in 0..10 {
            stats.add_score(i32::MAX);
        }

        assert_eq!(stats.average_score(), i32::MAX as f64);
    }
}
