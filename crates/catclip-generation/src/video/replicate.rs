//! Veo 3 hosted on Replicate.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use catclip_models::{GeneratedVideo, VideoPrompt, VideoProvider};

use crate::error::{GenerationError, GenerationResult};
use crate::http::{join_url, read_json};
use crate::video::operation::{poll_until, PollConfig, PollStatus};
use crate::video::VideoBackend;

const NEGATIVE_PROMPT: &str = "low quality, blurry, distorted";

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    enhance_prompt: bool,
    negative_prompt: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionOutput {
    Url(String),
    Urls(Vec<String>),
}

impl PredictionOutput {
    fn into_url(self) -> Option<String> {
        match self {
            PredictionOutput::Url(url) => Some(url),
            PredictionOutput::Urls(urls) => urls.into_iter().next(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: Option<String>,
    status: PredictionStatus,
    output: Option<PredictionOutput>,
    error: Option<serde_json::Value>,
}

impl Prediction {
    fn into_status(self) -> GenerationResult<PollStatus<String>> {
        match self.status {
            PredictionStatus::Succeeded => self
                .output
                .and_then(PredictionOutput::into_url)
                .map(PollStatus::Ready)
                .ok_or_else(|| GenerationError::invalid_response("no video URL in succeeded prediction")),
            PredictionStatus::Failed | PredictionStatus::Canceled => {
                let reason = self
                    .error
                    .map(|e| match e {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .unwrap_or_else(|| format!("{:?}", self.status).to_lowercase());
                Err(GenerationError::operation_failed(format!("prediction failed: {}", reason)))
            }
            PredictionStatus::Starting | PredictionStatus::Processing | PredictionStatus::Unknown => {
                Ok(PollStatus::Pending)
            }
        }
    }
}

/// Replicate client for `google/veo-3`.
pub struct ReplicateBackend {
    http: Client,
    api_key: String,
    base_url: String,
    poll: PollConfig,
}

impl ReplicateBackend {
    pub fn new(http: Client, api_key: impl Into<String>, base_url: impl Into<String>, poll: PollConfig) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            poll,
        }
    }

    async fn create(&self, prompt: &str) -> GenerationResult<Prediction> {
        let url = join_url(&self.base_url, "/v1/models/google/veo-3/predictions");

        let request = PredictionRequest {
            input: PredictionInput {
                prompt,
                enhance_prompt: true,
                negative_prompt: NEGATIVE_PROMPT,
            },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        read_json("replicate", response).await
    }

    async fn check(&self, prediction_id: &str) -> GenerationResult<PollStatus<String>> {
        let url = join_url(&self.base_url, &format!("/v1/predictions/{}", prediction_id));

        let response = self.http.get(&url).bearer_auth(&self.api_key).send().await?;

        let prediction: Prediction = read_json("replicate", response).await?;
        prediction.into_status()
    }
}

#[async_trait]
impl VideoBackend for ReplicateBackend {
    fn provider(&self) -> VideoProvider {
        VideoProvider::Veo3Replicate
    }

    async fn generate(&self, prompt: &VideoPrompt) -> GenerationResult<GeneratedVideo> {
        let mut prediction = self.create(&prompt.text).await?;

        let prediction_id = prediction
            .id
            .take()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GenerationError::invalid_response("no prediction id in response"))?;

        // Replicate can answer synchronously when the model is warm.
        let video_url = match prediction.into_status()? {
            PollStatus::Ready(url) => url,
            PollStatus::Pending => {
                info!(prediction = %prediction_id, "Replicate prediction started");
                let id = prediction_id.as_str();
                poll_until(VideoProvider::Veo3Replicate, &self.poll, move |_| self.check(id)).await?
            }
        };

        Ok(GeneratedVideo::new(prompt.id.clone(), VideoProvider::Veo3Replicate, video_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> ReplicateBackend {
        ReplicateBackend::new(
            Client::new(),
            "r8-test",
            server.uri(),
            PollConfig::new(5, Duration::from_millis(1)),
        )
    }

    async fn mount_create(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/v1/models/google/veo-3/predictions"))
            .and(header("authorization", "Bearer r8-test"))
            .and(body_partial_json(json!({
                "input": { "enhance_prompt": true, "negative_prompt": NEGATIVE_PROMPT }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_generate_polls_prediction() {
        let server = MockServer::start().await;
        mount_create(&server, json!({ "id": "pred-1", "status": "starting" })).await;

        Mock::given(method("GET"))
            .and(path("/v1/predictions/pred-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "pred-1", "status": "processing" })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/predictions/pred-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pred-1",
                "status": "succeeded",
                "output": "https://replicate.delivery/cat.mp4"
            })))
            .mount(&server)
            .await;

        let prompt = VideoPrompt::new("A cat runs a standup meeting.", "test");
        let video = backend(&server).generate(&prompt).await.unwrap();

        assert_eq!(video.video_url, "https://replicate.delivery/cat.mp4");
        assert_eq!(video.provider, VideoProvider::Veo3Replicate);
        assert_eq!(video.duration_secs, 8);
    }

    #[tokio::test]
    async fn test_generate_accepts_synchronous_output_list() {
        let server = MockServer::start().await;
        mount_create(
            &server,
            json!({
                "id": "pred-2",
                "status": "succeeded",
                "output": ["https://replicate.delivery/first.mp4", "https://replicate.delivery/second.mp4"]
            }),
        )
        .await;

        let prompt = VideoPrompt::new("A cat runs a standup meeting.", "test");
        let video = backend(&server).generate(&prompt).await.unwrap();
        assert_eq!(video.video_url, "https://replicate.delivery/first.mp4");
    }

    #[tokio::test]
    async fn test_generate_reports_failed_prediction() {
        let server = MockServer::start().await;
        mount_create(&server, json!({ "id": "pred-3", "status": "starting" })).await;

        Mock::given(method("GET"))
            .and(path("/v1/predictions/pred-3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pred-3",
                "status": "failed",
                "error": "NSFW content detected"
            })))
            .mount(&server)
            .await;

        let prompt = VideoPrompt::new("A cat runs a standup meeting.", "test");
        let err = backend(&server).generate(&prompt).await.unwrap_err();
        assert!(matches!(err, GenerationError::OperationFailed(_)));
        assert!(err.to_string().contains("NSFW content detected"));
    }

    #[test]
    fn test_unknown_status_is_pending() {
        let prediction: Prediction = serde_json::from_value(json!({ "id": "p", "status": "queued" })).unwrap();
        assert!(matches!(prediction.into_status(), Ok(PollStatus::Pending)));
    }

    #[test]
    fn test_canceled_without_error_names_status() {
        let prediction: Prediction = serde_json::from_value(json!({ "id": "p", "status": "canceled" })).unwrap();
        let err = prediction.into_status().unwrap_err();
        assert!(err.to_string().contains("canceled"));
    }
}
