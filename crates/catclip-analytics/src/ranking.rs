//! Ranking and bucketing over a slice of performance records.
//!
//! These functions never touch a lock; the store calls them on a snapshot.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};

use catclip_models::{PerformanceRecord, TimeSlot};

/// Limit used when a caller passes zero.
pub const DEFAULT_BEST_LIMIT: usize = 10;

/// Maximum number of time slots returned.
pub const MAX_TIME_SLOTS: usize = 5;

/// Normalize a caller-supplied limit, mapping zero to the default.
pub fn effective_limit(limit: usize) -> usize {
    if limit == 0 {
        DEFAULT_BEST_LIMIT
    } else {
        limit
    }
}

/// Top `limit` records by engagement rate, highest first.
///
/// The sort is stable, so equal rates keep their insertion order.
pub fn rank_by_engagement(mut records: Vec<PerformanceRecord>, limit: usize) -> Vec<PerformanceRecord> {
    records.sort_by(|a, b| b.engagement_rate.total_cmp(&a.engagement_rate));
    records.truncate(effective_limit(limit));
    records
}

/// Mean engagement rate, `0.0` for an empty slice.
pub fn mean_engagement_rate(records: &[PerformanceRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records.iter().map(|r| r.engagement_rate).sum();
    total / records.len() as f64
}

#[derive(Debug, Default)]
struct SlotAccumulator {
    total_engagement: f64,
    count: usize,
}

/// `(day_of_week, hour)` of a record in UTC, Sunday = 0.
pub fn slot_key(record: &PerformanceRecord) -> (u8, u8) {
    let day = record.posted_at.weekday().num_days_from_sunday() as u8;
    let hour = record.posted_at.hour() as u8;
    (day, hour)
}

/// Best hours of the week by mean engagement, at most [`MAX_TIME_SLOTS`].
///
/// Equal scores are ordered by ascending `(day_of_week, hour)`.
pub fn bucket_time_slots(records: &[PerformanceRecord]) -> Vec<TimeSlot> {
    let mut buckets: BTreeMap<(u8, u8), SlotAccumulator> = BTreeMap::new();

    for record in records {
        let slot = buckets.entry(slot_key(record)).or_default();
        slot.total_engagement += record.engagement_rate;
        slot.count += 1;
    }

    // BTreeMap iteration is key-ordered, and the stable sort keeps that order for ties.
    let mut slots: Vec<TimeSlot> = buckets
        .into_iter()
        .map(|((day_of_week, hour), acc)| TimeSlot {
            day_of_week,
            hour,
            performance_score: acc.total_engagement / acc.count as f64,
            post_count: acc.count,
        })
        .collect();

    slots.sort_by(|a, b| b.performance_score.total_cmp(&a.performance_score));
    slots.truncate(MAX_TIME_SLOTS);
    slots
}
