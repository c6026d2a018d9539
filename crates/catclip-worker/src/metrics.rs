//! Pipeline metrics.
//!
//! Emitted through the `metrics` facade. They are exported when the
//! embedded dashboard installs the Prometheus recorder and dropped otherwise.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const PIPELINE_RUNS_TOTAL: &str = "catclip_pipeline_runs_total";
    pub const PROMPTS_GENERATED_TOTAL: &str = "catclip_prompts_generated_total";
    pub const VIDEOS_GENERATED_TOTAL: &str = "catclip_videos_generated_total";
    pub const VIDEOS_FAILED_TOTAL: &str = "catclip_videos_failed_total";
    pub const VIDEO_GENERATION_DURATION_SECONDS: &str = "catclip_video_generation_duration_seconds";
    pub const POSTS_PUBLISHED_TOTAL: &str = "catclip_posts_published_total";
    pub const RECORDS_APPENDED_TOTAL: &str = "catclip_records_appended_total";
    pub const PROMOTIONS_TOTAL: &str = "catclip_promotions_total";
}

pub fn record_run() {
    counter!(names::PIPELINE_RUNS_TOTAL).increment(1);
}

pub fn record_prompts(count: usize) {
    counter!(names::PROMPTS_GENERATED_TOTAL).increment(count as u64);
}

pub fn record_video_generated(provider: &str, duration_secs: f64) {
    let labels = [("provider", provider.to_string())];
    counter!(names::VIDEOS_GENERATED_TOTAL, &labels).increment(1);
    histogram!(names::VIDEO_GENERATION_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_video_failed(provider: &str) {
    let labels = [("provider", provider.to_string())];
    counter!(names::VIDEOS_FAILED_TOTAL, &labels).increment(1);
}

pub fn record_post(mock: bool) {
    let labels = [("mock", mock.to_string())];
    counter!(names::POSTS_PUBLISHED_TOTAL, &labels).increment(1);
}

pub fn record_appended(synthetic: bool) {
    let labels = [("synthetic", synthetic.to_string())];
    counter!(names::RECORDS_APPENDED_TOTAL, &labels).increment(1);
}

pub fn record_promotion() {
    counter!(names::PROMOTIONS_TOTAL).increment(1);
}
