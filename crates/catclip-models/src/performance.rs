//! Post performance records and analytics result shapes.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{AccountId, PostId};

/// Engagement rate as `(likes + comments + shares) / views`.
///
/// Zero when `views` is zero. Summed in `f64` so any `u64` counts are valid.
pub fn engagement_rate(likes: u64, comments: u64, shares: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (likes as f64 + comments as f64 + shares as f64) / views as f64
}

/// Raw interaction counts fetched for a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EngagementCounts {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: u64,
}

impl EngagementCounts {
    pub fn new(likes: u64, comments: u64, shares: u64, views: u64) -> Self {
        Self {
            likes,
            comments,
            shares,
            views,
        }
    }

    /// Saturates at `u64::MAX`.
    pub fn total_interactions(&self) -> u64 {
        self.likes
            .saturating_add(self.comments)
            .saturating_add(self.shares)
    }

    pub fn engagement_rate(&self) -> f64 {
        engagement_rate(self.likes, self.comments, self.shares, self.views)
    }
}

/// Where a record's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSource {
    /// Fetched from the platform's insights endpoint
    #[default]
    Live,
    /// Placeholder numbers substituted when the fetch failed
    Synthetic,
}

/// Engagement snapshot for one published post.
///
/// Immutable once appended to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceRecord {
    pub post_id: PostId,
    pub account_id: AccountId,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: u64,
    /// Authoritative rate; never re-derived from the counts once stored.
    pub engagement_rate: f64,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub source: MetricsSource,
}

impl PerformanceRecord {
    /// Build a record whose rate is derived from `counts`.
    pub fn new(
        post_id: impl Into<PostId>,
        account_id: impl Into<AccountId>,
        counts: EngagementCounts,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self::with_rate(post_id, account_id, counts, counts.engagement_rate(), posted_at)
    }

    /// Build a record with a caller-supplied engagement rate.
    ///
    /// Negative or non-finite rates are stored as `0.0`.
    pub fn with_rate(
        post_id: impl Into<PostId>,
        account_id: impl Into<AccountId>,
        counts: EngagementCounts,
        engagement_rate: f64,
        posted_at: DateTime<Utc>,
    ) -> Self {
        let engagement_rate = if engagement_rate.is_finite() && engagement_rate > 0.0 {
            engagement_rate
        } else {
            0.0
        };

        Self {
            post_id: post_id.into(),
            account_id: account_id.into(),
            likes: counts.likes,
            comments: counts.comments,
            shares: counts.shares,
            views: counts.views,
            engagement_rate,
            posted_at,
            source: MetricsSource::Live,
        }
    }

    /// Mark the record as built from placeholder numbers.
    pub fn synthetic(mut self) -> Self {
        self.source = MetricsSource::Synthetic;
        self
    }

    pub fn counts(&self) -> EngagementCounts {
        EngagementCounts::new(self.likes, self.comments, self.shares, self.views)
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == MetricsSource::Synthetic
    }
}

/// Mean engagement for posts published in one hour of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeSlot {
    /// Day of week in UTC, 0 = Sunday through 6 = Saturday
    pub day_of_week: u8,
    /// Hour of day in UTC, 0 through 23
    pub hour: u8,
    /// Mean engagement rate of the posts in this slot
    pub performance_score: f64,
    /// Number of posts that fell into this slot
    pub post_count: usize,
}

/// Aggregate view over the full performance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyticsSummary {
    pub total_posts: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub average_engagement_rate: f64,
    pub best_performing_post: Option<PerformanceRecord>,
    pub optimal_times: Vec<TimeSlot>,
}

impl AnalyticsSummary {
    /// Summary of an empty history.
    pub fn empty() -> Self {
        Self {
            total_posts: 0,
            total_views: 0,
            total_likes: 0,
            average_engagement_rate: 0.0,
            best_performing_post: None,
            optimal_times: Vec::new(),
        }
    }
}
