//! Generated video models and video providers.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::{PromptId, VideoId};

/// Video generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum VideoProvider {
    /// Veo 2 through the Gemini API
    #[default]
    #[serde(rename = "veo2")]
    Veo2,
    /// Veo 3 hosted on Replicate
    #[serde(rename = "veo3-replicate")]
    Veo3Replicate,
    /// Veo 3 on Vertex AI
    #[serde(rename = "veo3-vertex")]
    Veo3Vertex,
}

impl VideoProvider {
    pub const ALL: [VideoProvider; 3] = [
        VideoProvider::Veo2,
        VideoProvider::Veo3Replicate,
        VideoProvider::Veo3Vertex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoProvider::Veo2 => "veo2",
            VideoProvider::Veo3Replicate => "veo3-replicate",
            VideoProvider::Veo3Vertex => "veo3-vertex",
        }
    }

    /// Clip length the provider renders, in seconds.
    pub fn default_duration_secs(&self) -> u32 {
        match self {
            VideoProvider::Veo2 => 5,
            VideoProvider::Veo3Replicate | VideoProvider::Veo3Vertex => 8,
        }
    }
}

impl fmt::Display for VideoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown provider name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown video provider '{0}' (expected veo2, veo3-replicate or veo3-vertex)")]
pub struct UnknownProvider(pub String);

impl FromStr for VideoProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        VideoProvider::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// A video rendered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedVideo {
    /// Unique video ID
    pub id: VideoId,

    /// Prompt the video was rendered from
    pub prompt_id: PromptId,

    /// Provider that rendered it
    pub provider: VideoProvider,

    /// Public URL of the rendered file
    pub video_url: String,

    /// Clip duration in seconds
    pub duration_secs: u32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl GeneratedVideo {
    /// Create a record for a freshly rendered video.
    pub fn new(prompt_id: PromptId, provider: VideoProvider, video_url: impl Into<String>) -> Self {
        Self {
            id: VideoId::new(),
            prompt_id,
            provider,
            video_url: video_url.into(),
            duration_secs: provider.default_duration_secs(),
            created_at: Utc::now(),
        }
    }
}
