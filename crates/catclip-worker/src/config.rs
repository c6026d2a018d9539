//! Worker configuration.

use std::time::Duration;

use catclip_models::InstagramAccount;

use crate::retry::RetryConfig;

/// Instagram accounts the pipeline knows about: (id, username, token variable, is main).
const ACCOUNTS: [(&str, &str, &str, bool); 3] = [
    ("test1", "cat_vibes_1", "INSTA_TOKEN_1", false),
    ("test2", "cat_vibes_2", "INSTA_TOKEN_2", false),
    ("main", "main_cat_account", "INSTA_TOKEN_MAIN", true),
];

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Prompts (and therefore videos) per run
    pub prompt_batch_size: usize,
    /// Wait between posting and reading insights
    pub insights_delay: Duration,
    /// Run repeatedly at this interval; `None` runs once
    pub pipeline_interval: Option<Duration>,
    /// Serve the analytics dashboard from this process
    pub dashboard_enabled: bool,
    /// Posting targets
    pub accounts: Vec<InstagramAccount>,
    /// Backoff for promotion posts to the main account
    pub promotion_retry: RetryConfig,
    /// Re-render attempts after a transient video generation failure
    pub video_retry: RetryConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            prompt_batch_size: 3,
            insights_delay: Duration::ZERO,
            pipeline_interval: None,
            dashboard_enabled: true,
            accounts: Vec::new(),
            promotion_retry: RetryConfig::new("promote_to_main"),
            video_retry: RetryConfig::new("generate_video").with_max_retries(1),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            prompt_batch_size: std::env::var("PROMPT_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.prompt_batch_size),
            insights_delay: Duration::from_secs(
                std::env::var("INSIGHTS_DELAY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
            ),
            pipeline_interval: std::env::var("PIPELINE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            dashboard_enabled: std::env::var("DASHBOARD_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.dashboard_enabled),
            accounts: accounts_from_env(),
            promotion_retry: defaults.promotion_retry.with_max_retries(
                std::env::var("PROMOTION_MAX_RETRIES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3),
            ),
            video_retry: defaults.video_retry.with_max_retries(
                std::env::var("VIDEO_MAX_RETRIES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1),
            ),
        }
    }
}

/// Build the known accounts. An account without a token is inactive.
pub fn accounts_from_env() -> Vec<InstagramAccount> {
    ACCOUNTS
        .iter()
        .map(|(id, username, token_var, is_main)| {
            let token = std::env::var(token_var).unwrap_or_default();
            let active = !token.trim().is_empty();
            InstagramAccount::new(*id, *username, token, *is_main).with_active(active)
        })
        .collect()
}
