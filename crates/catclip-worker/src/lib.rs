//! Content pipeline worker.
//!
//! This crate provides:
//! - The end-to-end content pipeline (prompts, videos, posting, insights, promotion)
//! - Run-scoped structured logging and pipeline metrics
//! - Retry with exponential backoff for vendor calls
//! - The analytics dashboard embedded on the pipeline's store

pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod retry;

pub use config::WorkerConfig;
pub use dashboard::Dashboard;
pub use error::{WorkerError, WorkerResult};
pub use logging::RunLogger;
pub use pipeline::{ContentPipeline, PipelineReport};
pub use retry::{retry_async, retry_async_when, RetryConfig, RetryResult};

/// Initialize tracing with colored output for dev, JSON when `LOG_FORMAT=json`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    if let Ok(directive) = "catclip=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}
