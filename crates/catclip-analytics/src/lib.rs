//! Post performance analytics.
//!
//! This crate provides:
//! - An append-only, thread-safe performance store
//! - Best-performer ranking and hour-of-week time slot analysis
//! - The promotion decision used to escalate posts to the main account

pub mod promotion;
pub mod ranking;
pub mod store;


pub use promotion::PromotionPolicy;
pub use ranking::{
    bucket_time_slots, mean_engagement_rate, rank_by_engagement, DEFAULT_BEST_LIMIT,
    MAX_TIME_SLOTS,
};
pub use store::PerformanceStore;
