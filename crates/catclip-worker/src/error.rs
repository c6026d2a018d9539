//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Generation error: {0}")]
    Generation(#[from] catclip_generation::GenerationError),

    #[error("Instagram error: {0}")]
    Instagram(#[from] catclip_instagram::InstagramError),

    #[error("Dashboard error: {0}")]
    Dashboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn dashboard(msg: impl Into<String>) -> Self {
        Self::Dashboard(msg.into())
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            WorkerError::Generation(e) => e.is_retryable(),
            WorkerError::Instagram(e) => e.is_retryable(),
            _ => false,
        }
    }
}
