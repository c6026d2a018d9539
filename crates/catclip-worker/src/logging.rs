//! Structured logging for pipeline runs.
//!
//! Every line a run emits carries the run ID and the stage it belongs to,
//! so one run can be followed through JSON logs.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Pipeline stages, in execution order.
pub mod stage {
    pub const PROMPTS: &str = "prompts";
    pub const VIDEOS: &str = "videos";
    pub const POSTING: &str = "posting";
    pub const INSIGHTS: &str = "insights";
    pub const PROMOTION: &str = "promotion";
    pub const SUMMARY: &str = "summary";
}

/// Run-scoped logger.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
}

impl Default for RunLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl RunLogger {
    /// Create a logger with a fresh run ID.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn from_string(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(run_id = %self.run_id, "Run started: {}", message);
    }

    pub fn log_stage(&self, stage: &str, message: &str) {
        info!(run_id = %self.run_id, stage, "{}", message);
    }

    pub fn log_warning(&self, stage: &str, message: &str) {
        warn!(run_id = %self.run_id, stage, "{}", message);
    }

    pub fn log_error(&self, stage: &str, message: &str) {
        error!(run_id = %self.run_id, stage, "{}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(run_id = %self.run_id, "Run completed: {}", message);
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Span to instrument the whole run with.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("pipeline_run", run_id = %self.run_id)
    }
}
