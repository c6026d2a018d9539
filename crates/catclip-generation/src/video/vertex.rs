//! Veo 3 on Vertex AI.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use catclip_models::{GeneratedVideo, VideoPrompt, VideoProvider};

use crate::error::{GenerationError, GenerationResult};
use crate::http::{join_url, read_json};
use crate::video::operation::{poll_until, Operation, PollConfig, PollStatus};
use crate::video::VideoBackend;

pub const VERTEX_VEO3_MODEL: &str = "veo-3.0-generate-preview";

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<Instance<'a>>,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    aspect_ratio: &'static str,
    duration_seconds: u32,
    number_of_videos: u32,
}

#[derive(Debug, Default, Deserialize)]
struct VertexResponse {
    #[serde(default)]
    predictions: Vec<VertexPrediction>,
    #[serde(default)]
    videos: Vec<VertexVideo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VertexPrediction {
    video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VertexVideo {
    gcs_uri: Option<String>,
}

impl VertexResponse {
    fn video_url(self) -> Option<String> {
        self.predictions
            .into_iter()
            .find_map(|p| p.video_url)
            .or_else(|| self.videos.into_iter().find_map(|v| v.gcs_uri))
    }
}

/// Vertex AI client for Veo 3 renders.
pub struct VertexBackend {
    http: Client,
    access_token: String,
    project_id: String,
    location: String,
    base_url: String,
    poll: PollConfig,
}

impl VertexBackend {
    pub fn new(
        http: Client,
        access_token: impl Into<String>,
        project_id: impl Into<String>,
        location: impl Into<String>,
        base_url: impl Into<String>,
        poll: PollConfig,
    ) -> Self {
        Self {
            http,
            access_token: access_token.into(),
            project_id: project_id.into(),
            location: location.into(),
            base_url: base_url.into(),
            poll,
        }
    }

    fn predict_path(&self) -> String {
        format!(
            "/v1/projects/{}/locations/{}/publishers/google/models/{}:predictLongRunning",
            self.project_id, self.location, VERTEX_VEO3_MODEL
        )
    }

    async fn start(&self, prompt: &str) -> GenerationResult<String> {
        if self.project_id.is_empty() {
            return Err(GenerationError::config_error("GOOGLE_PROJECT_ID is required for Vertex AI"));
        }

        let url = join_url(&self.base_url, &self.predict_path());

        let request = PredictRequest {
            instances: vec![Instance { prompt }],
            parameters: Parameters {
                aspect_ratio: "9:16",
                duration_seconds: VideoProvider::Veo3Vertex.default_duration_secs(),
                number_of_videos: 1,
            },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let operation: Operation<VertexResponse> = read_json("vertex", response).await?;
        operation.into_name()
    }

    async fn check(&self, operation_name: &str) -> GenerationResult<PollStatus<String>> {
        let url = join_url(&self.base_url, &format!("/v1/{}", operation_name));

        let response = self.http.get(&url).bearer_auth(&self.access_token).send().await?;

        let operation: Operation<VertexResponse> = read_json("vertex", response).await?;
        operation.into_status(VertexResponse::video_url)
    }
}

#[async_trait]
impl VideoBackend for VertexBackend {
    fn provider(&self) -> VideoProvider {
        VideoProvider::Veo3Vertex
    }

    async fn generate(&self, prompt: &VideoPrompt) -> GenerationResult<GeneratedVideo> {
        let operation_name = self.start(&prompt.text).await?;
        info!(operation = %operation_name, "Vertex AI render started");

        let name = operation_name.as_str();
        let video_url = poll_until(VideoProvider::Veo3Vertex, &self.poll, move |_| self.check(name)).await?;

        Ok(GeneratedVideo::new(prompt.id.clone(), VideoProvider::Veo3Vertex, video_url))
    }
}
