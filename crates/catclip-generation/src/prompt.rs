//! OpenAI-backed prompt generator for post-ironic cat videos.

use std::time::Duration;

use rand::seq::IndexedRandom;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use catclip_models::VideoPrompt;

use crate::config::GenerationConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::http::{build_client, join_url, read_json};

pub const DEFAULT_PROMPT_MODEL: &str = "gpt-4o-mini";

pub const THEMES: [&str; 10] = [
    "existential dread",
    "corporate middle management",
    "gen z slang misuse",
    "cryptocurrency obsession",
    "wellness influencer parody",
    "linkedin motivational posts",
    "artisanal everything",
    "sustainable living anxiety",
    "dating app failures",
    "work from home chaos",
];

pub const SITUATIONS: [&str; 10] = [
    "realizes they've been eating the same cardboard for 3 years",
    "discovers their humans are just large, hairless cats",
    "starts a podcast about the futility of chasing laser dots",
    "becomes a life coach for other cats",
    "opens a meditation retreat for anxious house pets",
    "launches a startup selling cardboard boxes as premium furniture",
    "writes passive-aggressive emails to their food dispenser",
    "practices mindfulness while knocking things off tables",
    "develops an elaborate conspiracy theory about vacuum cleaners",
    "starts a support group for cats with imposter syndrome",
];

const SYSTEM_PROMPT: &str = "You are a creative director for post-ironic cat content. \
Generate absurd, slightly meta video prompts that combine internet culture with cat behavior. \
Keep it weird but family-friendly.";

/// Used when the model answers with an empty completion.
pub const EMPTY_COMPLETION_FALLBACK: &str =
    "A cat stares judgmentally at the camera while questioning the meaning of existence.";

/// Chat completion request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

/// Chat completion response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Prompt used when the completion request fails.
pub fn fallback_prompt_text(theme: &str, situation: &str) -> String {
    format!(
        "A cat {} while contemplating {}, occasionally making direct eye contact with the camera to break the fourth wall.",
        situation, theme
    )
}

fn pick_topic() -> (&'static str, &'static str) {
    let mut rng = rand::rng();
    let theme = THEMES.choose(&mut rng).copied().unwrap_or(THEMES[0]);
    let situation = SITUATIONS.choose(&mut rng).copied().unwrap_or(SITUATIONS[0]);
    (theme, situation)
}

/// Generates video prompts with an OpenAI chat model.
pub struct PromptGenerator {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl PromptGenerator {
    /// Create a new prompt generator.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> GenerationResult<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: DEFAULT_PROMPT_MODEL.to_string(),
        })
    }

    pub fn from_config(config: &GenerationConfig) -> GenerationResult<Self> {
        Self::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.request_timeout,
        )
    }

    /// Use a different chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate one prompt.
    ///
    /// Never fails: request errors fall back to a templated prompt built from
    /// the chosen theme and situation.
    pub async fn generate_prompt(&self) -> VideoPrompt {
        let (theme, situation) = pick_topic();

        match self.request_completion(theme, situation).await {
            Ok(text) if !text.trim().is_empty() => VideoPrompt::new(text.trim(), theme),
            Ok(_) => {
                warn!(theme, "Prompt model returned an empty completion");
                VideoPrompt::new(EMPTY_COMPLETION_FALLBACK, theme)
            }
            Err(e) => {
                warn!(theme, "Failed to generate prompt, using fallback: {}", e);
                VideoPrompt::new(fallback_prompt_text(theme, situation), theme)
            }
        }
    }

    /// Generate `count` prompts sequentially.
    pub async fn generate_batch(&self, count: usize) -> Vec<VideoPrompt> {
        let mut prompts = Vec::with_capacity(count);
        for i in 0..count {
            let prompt = self.generate_prompt().await;
            debug!(index = i + 1, theme = %prompt.theme, "Generated prompt");
            prompts.push(prompt);
        }
        info!("Generated {} prompts", prompts.len());
        prompts
    }

    async fn request_completion(&self, theme: &str, situation: &str) -> GenerationResult<String> {
        let url = join_url(&self.base_url, "/v1/chat/completions");

        let user_prompt = format!(
            "Create a short video prompt (1-2 sentences) about a cat dealing with \"{}\" where the cat {}. Make it absurd and slightly self-aware.",
            theme, situation
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: 150,
            temperature: 0.9,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let chat: ChatResponse = read_json("openai", response).await?;

        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| GenerationError::invalid_response("no choices in chat completion"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn generator(server: &MockServer) -> PromptGenerator {
        PromptGenerator::new("sk-test", server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_prompt_uses_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "  A cat hosts a webinar.  "}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let prompt = generator(&server).await.generate_prompt().await;
        assert_eq!(prompt.text, "A cat hosts a webinar.");
        assert!(THEMES.contains(&prompt.theme.as_str()));
    }

    #[tokio::test]
    async fn test_generate_prompt_falls_back_on_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let prompt = generator(&server).await.generate_prompt().await;
        assert!(prompt.text.starts_with("A cat "));
        assert!(prompt.text.contains(&prompt.theme));
        assert!(prompt.text.ends_with("to break the fourth wall."));
    }

    #[tokio::test]
    async fn test_generate_prompt_handles_empty_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": ""}}]
            })))
            .mount(&server)
            .await;

        let prompt = generator(&server).await.generate_prompt().await;
        assert_eq!(prompt.text, EMPTY_COMPLETION_FALLBACK);
    }

    #[tokio::test]
    async fn test_generate_prompt_without_choices_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let prompt = generator(&server).await.generate_prompt().await;
        assert!(prompt.text.ends_with("to break the fourth wall."));
    }

    #[tokio::test]
    async fn test_generate_batch_returns_requested_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "A cat audits the fridge."}}]
            })))
            .expect(3)
            .mount(&server)
            .await;

        let prompts = generator(&server).await.generate_batch(3).await;
        assert_eq!(prompts.len(), 3);
        assert_ne!(prompts[0].id, prompts[1].id);
    }

    #[test]
    fn test_fallback_prompt_text() {
        let text = fallback_prompt_text("existential dread", "becomes a life coach for other cats");
        assert_eq!(
            text,
            "A cat becomes a life coach for other cats while contemplating existential dread, occasionally making direct eye contact with the camera to break the fourth wall."
        );
    }
}
