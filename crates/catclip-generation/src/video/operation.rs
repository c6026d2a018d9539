//! Polling for long-running vendor operations.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use catclip_models::VideoProvider;

use crate::error::{GenerationError, GenerationResult};

/// How often and how long to poll a render job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(10),
        }
    }
}

impl PollConfig {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

/// Outcome of one poll.
#[derive(Debug)]
pub(crate) enum PollStatus<T> {
    Pending,
    Ready(T),
}

/// Call `check` until it reports `Ready`, sleeping `interval` between
/// pending attempts. Errors from `check` end polling immediately.
pub(crate) async fn poll_until<F, Fut, T>(
    provider: VideoProvider,
    config: &PollConfig,
    check: F,
) -> GenerationResult<T>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = GenerationResult<PollStatus<T>>>,
{
    for attempt in 1..=config.max_attempts {
        match check(attempt).await? {
            PollStatus::Ready(value) => return Ok(value),
            PollStatus::Pending => {
                info!(
                    provider = %provider,
                    "Video generation in progress... (attempt {}/{})",
                    attempt, config.max_attempts
                );
                if attempt < config.max_attempts {
                    tokio::time::sleep(config.interval).await;
                }
            }
        }
    }

    Err(GenerationError::Timeout {
        attempts: config.max_attempts,
    })
}

/// Google long-running operation, shared by the Gemini API and Vertex AI.
#[derive(Debug, Deserialize)]
pub(crate) struct Operation<R> {
    pub name: Option<String>,
    #[serde(default)]
    pub done: bool,
    pub error: Option<OperationStatus>,
    pub response: Option<R>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OperationStatus {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code {}: {}", self.code, self.message)
    }
}

impl<R> Operation<R> {
    /// Name to poll, required on the initial response.
    pub fn into_name(self) -> GenerationResult<String> {
        self.name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| GenerationError::invalid_response("no operation name in response"))
    }

    /// Map a polled operation to a poll status, extracting the video URL
    /// with `url_of` once it is done.
    pub fn into_status(self, url_of: impl FnOnce(R) -> Option<String>) -> GenerationResult<PollStatus<String>> {
        if !self.done {
            return Ok(PollStatus::Pending);
        }

        if let Some(status) = self.error {
            return Err(GenerationError::operation_failed(format!("operation failed: {}", status)));
        }

        self.response
            .and_then(url_of)
            .map(PollStatus::Ready)
            .ok_or_else(|| GenerationError::invalid_response("no video URL in completed operation"))
    }
}
