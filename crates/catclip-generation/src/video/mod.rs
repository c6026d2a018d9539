//! Video generation across interchangeable providers.

mod operation;
mod replicate;
mod veo2;
mod vertex;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use catclip_models::{GeneratedVideo, VideoPrompt, VideoProvider};

use crate::config::GenerationConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::http::build_client;

pub use operation::PollConfig;
pub use replicate::ReplicateBackend;
pub use veo2::{Veo2Backend, VEO2_MODEL};
pub use vertex::{VertexBackend, VERTEX_VEO3_MODEL};

/// Prompt rendered by [`VideoGenerator::test_generation`] when no text is given.
pub const DEFAULT_TEST_PROMPT: &str = "A fluffy orange cat wearing sunglasses sits in a director's chair, \
occasionally looking directly at the camera with an expression of existential contemplation";

/// A provider that renders a prompt into a hosted video.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    fn provider(&self) -> VideoProvider;

    async fn generate(&self, prompt: &VideoPrompt) -> GenerationResult<GeneratedVideo>;
}

/// Dispatches render requests to the active provider's backend.
pub struct VideoGenerator {
    backends: HashMap<VideoProvider, Arc<dyn VideoBackend>>,
    provider: VideoProvider,
}

impl VideoGenerator {
    /// Create a generator with no backends.
    pub fn new(provider: VideoProvider) -> Self {
        Self {
            backends: HashMap::new(),
            provider,
        }
    }

    /// Build all three vendor backends from configuration, sharing one HTTP client.
    pub fn from_config(config: &GenerationConfig) -> GenerationResult<Self> {
        let http = build_client(config.request_timeout)?;

        Ok(Self::new(config.provider)
            .with_backend(Arc::new(Veo2Backend::new(
                http.clone(),
                config.gemini_api_key.clone(),
                config.gemini_base_url.clone(),
                config.poll.clone(),
            )))
            .with_backend(Arc::new(ReplicateBackend::new(
                http.clone(),
                config.replicate_api_key.clone(),
                config.replicate_base_url.clone(),
                config.poll.clone(),
            )))
            .with_backend(Arc::new(VertexBackend::new(
                http,
                config.vertex_access_token.clone(),
                config.google_project_id.clone(),
                config.vertex_location.clone(),
                config.vertex_base_url.clone(),
                config.poll.clone(),
            ))))
    }

    /// Register a backend under its own provider, replacing any existing one.
    pub fn with_backend(mut self, backend: Arc<dyn VideoBackend>) -> Self {
        self.backends.insert(backend.provider(), backend);
        self
    }

    pub fn provider(&self) -> VideoProvider {
        self.provider
    }

    /// Switch the active provider.
    pub fn set_provider(&mut self, provider: VideoProvider) {
        info!(from = %self.provider, to = %provider, "Switched video provider");
        self.provider = provider;
    }

    /// Render one prompt with the active provider.
    pub async fn generate_video(&self, prompt: &VideoPrompt) -> GenerationResult<GeneratedVideo> {
        let backend = self.backends.get(&self.provider).ok_or_else(|| {
            GenerationError::config_error(format!("no backend configured for provider {}", self.provider))
        })?;

        info!(
            provider = %self.provider,
            prompt_id = %prompt.id,
            "Generating video"
        );

        let video = backend.generate(prompt).await?;

        info!(
            video_id = %video.id,
            provider = %video.provider,
            url = %video.video_url,
            "Video generated"
        );

        Ok(video)
    }

    /// Render every prompt in order, skipping the ones that fail.
    pub async fn generate_batch(&self, prompts: &[VideoPrompt]) -> Vec<GeneratedVideo> {
        let mut videos = Vec::with_capacity(prompts.len());

        for (i, prompt) in prompts.iter().enumerate() {
            match self.generate_video(prompt).await {
                Ok(video) => videos.push(video),
                Err(e) => warn!(
                    index = i + 1,
                    prompt_id = %prompt.id,
                    "Failed to generate video: {}", e
                ),
            }
        }

        info!("Generated {}/{} videos", videos.len(), prompts.len());
        videos
    }

    /// Render a custom prompt, or [`DEFAULT_TEST_PROMPT`] when `text` is empty.
    pub async fn test_generation(&self, text: &str) -> GenerationResult<GeneratedVideo> {
        let text = if text.trim().is_empty() {
            DEFAULT_TEST_PROMPT
        } else {
            text
        };

        self.generate_video(&VideoPrompt::new(text, "test")).await
    }
}
