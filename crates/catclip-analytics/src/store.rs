//! Append-only, thread-safe store of post performance records.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use catclip_models::{AnalyticsSummary, PerformanceRecord, TimeSlot};

use crate::promotion::PromotionPolicy;
use crate::ranking::{bucket_time_slots, mean_engagement_rate, rank_by_engagement};

/// Performance history for the lifetime of the process.
///
/// Appends take the write lock; every query copies the history out under
/// the read lock and computes on the copy, so a query always sees a
/// consistent prefix of the log. Share one instance behind an `Arc`.
#[derive(Debug, Default)]
pub struct PerformanceStore {
    records: RwLock<Vec<PerformanceRecord>>,
    policy: PromotionPolicy,
}

impl PerformanceStore {
    /// Create an empty store with the default promotion policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a custom promotion policy.
    pub fn with_policy(policy: PromotionPolicy) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            policy,
        }
    }

    pub fn policy(&self) -> PromotionPolicy {
        self.policy
    }

    // A push cannot leave the vector half-written, so a poisoned lock still
    // guards valid data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<PerformanceRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<PerformanceRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a record. Duplicate post IDs are kept and counted separately.
    pub fn append(&self, record: PerformanceRecord) {
        debug!(
            post_id = %record.post_id,
            account_id = %record.account_id,
            engagement_rate = record.engagement_rate,
            "Recording post performance"
        );
        self.write().push(record);
    }

    /// Number of records appended so far.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the full history in insertion order.
    pub fn snapshot(&self) -> Vec<PerformanceRecord> {
        self.read().clone()
    }

    /// Up to `limit` records by engagement rate, highest first.
    ///
    /// A `limit` of zero means 10. Equal rates keep insertion order.
    pub fn best_performing(&self, limit: usize) -> Vec<PerformanceRecord> {
        rank_by_engagement(self.snapshot(), limit)
    }

    /// The five best `(day_of_week, hour)` slots in UTC by mean engagement.
    pub fn optimal_time_slots(&self) -> Vec<TimeSlot> {
        bucket_time_slots(&self.read())
    }

    /// Mean engagement rate over the whole history, `0.0` when empty.
    pub fn average_engagement_rate(&self) -> f64 {
        mean_engagement_rate(&self.read())
    }

    /// Whether `record` beats the promotion policy against the current average.
    ///
    /// The answer depends on the history at call time and can change as more
    /// records arrive.
    pub fn should_promote(&self, record: &PerformanceRecord) -> bool {
        self.policy.qualifies(record, self.average_engagement_rate())
    }

    /// Engagement rate a post must currently exceed to be promoted.
    pub fn promotion_threshold(&self) -> f64 {
        self.policy.threshold(self.average_engagement_rate())
    }

    /// Totals, average, best post and best time slots from a single snapshot.
    pub fn summary(&self) -> AnalyticsSummary {
        let records = self.snapshot();
        if records.is_empty() {
            return AnalyticsSummary::empty();
        }

        let total_views = records.iter().map(|r| r.views).fold(0u64, u64::saturating_add);
        let total_likes = records.iter().map(|r| r.likes).fold(0u64, u64::saturating_add);
        let average_engagement_rate = mean_engagement_rate(&records);
        let optimal_times = bucket_time_slots(&records);
        let total_posts = records.len();
        let best_performing_post = rank_by_engagement(records, 1).into_iter().next();

        AnalyticsSummary {
            total_posts,
            total_views,
            total_likes,
            average_engagement_rate,
            best_performing_post,
            optimal_times,
        }
    }
}
