//! Veo 2 through the Gemini API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use catclip_models::{GeneratedVideo, VideoPrompt, VideoProvider};

use crate::error::GenerationResult;
use crate::http::{join_url, read_json};
use crate::video::operation::{poll_until, Operation, PollConfig, PollStatus};
use crate::video::VideoBackend;

pub const VEO2_MODEL: &str = "veo-2.0-generate-001";

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
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VeoResponse {
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: Option<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    uri: Option<String>,
}

impl VeoResponse {
    fn video_url(self) -> Option<String> {
        self.generate_video_response?
            .generated_samples
            .into_iter()
            .find_map(|s| s.video.and_then(|v| v.uri))
    }
}

/// Gemini API client for Veo 2 renders.
pub struct Veo2Backend {
    http: Client,
    api_key: String,
    base_url: String,
    poll: PollConfig,
}

impl Veo2Backend {
    pub fn new(http: Client, api_key: impl Into<String>, base_url: impl Into<String>, poll: PollConfig) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            poll,
        }
    }

    async fn start(&self, prompt: &str) -> GenerationResult<String> {
        let url = join_url(
            &self.base_url,
            &format!("/v1beta/models/{}:predictLongRunning", VEO2_MODEL),
        );

        let request = PredictRequest {
            instances: vec![Instance { prompt }],
            parameters: Parameters { aspect_ratio: "9:16" },
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let operation: Operation<VeoResponse> = read_json("gemini", response).await?;
        operation.into_name()
    }

    async fn check(&self, operation_name: &str) -> GenerationResult<PollStatus<String>> {
        let url = join_url(&self.base_url, &format!("/v1beta/{}", operation_name));

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let operation: Operation<VeoResponse> = read_json("gemini", response).await?;
        operation.into_status(VeoResponse::video_url)
    }
}

#[async_trait]
impl VideoBackend for Veo2Backend {
    fn provider(&self) -> VideoProvider {
        VideoProvider::Veo2
    }

    async fn generate(&self, prompt: &VideoPrompt) -> GenerationResult<GeneratedVideo> {
        let operation_name = self.start(&prompt.text).await?;
        info!(operation = %operation_name, "Veo 2 render started");

        let name = operation_name.as_str();
        let video_url = poll_until(VideoProvider::Veo2, &self.poll, move |_| self.check(name)).await?;

        Ok(GeneratedVideo::new(prompt.id.clone(), VideoProvider::Veo2, video_url))
    }
}
