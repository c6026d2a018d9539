//! Promotion thresholds.

use serde::{Deserialize, Serialize};

use catclip_models::PerformanceRecord;

/// Rules for escalating a test-account post to the main account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PromotionPolicy {
    /// Required multiple of the historical average engagement rate (strict)
    pub multiplier: f64,
    /// Views the post must exceed (strict)
    pub min_views: u64,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            multiplier: 1.5,
            min_views: 500,
        }
    }
}

impl PromotionPolicy {
    /// Engagement rate a post must exceed given the current average.
    pub fn threshold(&self, average_engagement_rate: f64) -> f64 {
        average_engagement_rate * self.multiplier
    }

    /// Point-in-time decision against an already computed average.
    pub fn qualifies(&self, record: &PerformanceRecord, average_engagement_rate: f64) -> bool {
        record.engagement_rate > self.threshold(average_engagement_rate) && record.views > self.min_views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catclip_models::EngagementCounts;
    use chrono::Utc;

    fn record(rate: f64, views: u64) -> PerformanceRecord {
        PerformanceRecord::with_rate("p", "a", EngagementCounts::new(0, 0, 0, views), rate, Utc::now())
    }

    #[test]
    fn test_default_policy() {
        let policy = PromotionPolicy::default();
        assert_eq!(policy.multiplier, 1.5);
        assert_eq!(policy.min_views, 500);
        assert!((policy.threshold(0.1) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_both_conditions_are_strict() {
        let policy = PromotionPolicy::default();

        assert!(policy.qualifies(&record(0.2, 501), 0.1));
        assert!(!policy.qualifies(&record(0.2, 500), 0.1));
        assert!(!policy.qualifies(&record(0.15, 10_000), 0.1));
    }

    #[test]
    fn test_custom_policy() {
        let policy = PromotionPolicy {
            multiplier: 2.0,
            min_views: 100,
        };
        assert!(policy.qualifies(&record(0.25, 101), 0.1));
        assert!(!policy.qualifies(&record(0.2, 101), 0.1));
    }
}
