//! Shared data models for the CatClip pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Prompts and generated videos
//! - Instagram accounts
//! - Post performance records and analytics summaries

pub mod account;
pub mod ids;
pub mod performance;
pub mod prompt;
pub mod video;

// Re-export common types
pub use account::InstagramAccount;
pub use ids::{AccountId, PostId, PromptId, VideoId};
pub use performance::{
    engagement_rate, AnalyticsSummary, EngagementCounts, MetricsSource, PerformanceRecord,
    TimeSlot,
};
pub use prompt::VideoPrompt;
pub use video::{GeneratedVideo, UnknownProvider, VideoProvider};
