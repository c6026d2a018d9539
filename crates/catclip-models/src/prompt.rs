//! Video prompt models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::PromptId;

/// A text prompt handed to a video generation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoPrompt {
    /// Unique prompt ID
    pub id: PromptId,

    /// Prompt text sent to the video model
    pub text: String,

    /// Theme the prompt was built around
    pub theme: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl VideoPrompt {
    /// Create a new prompt with a fresh ID.
    pub fn new(text: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            id: PromptId::new(),
            text: text.into(),
            theme: theme.into(),
            created_at: Utc::now(),
        }
    }
}
