//! Generation configuration.

use std::time::Duration;

use catclip_models::VideoProvider;

use crate::error::{GenerationError, GenerationResult};
use crate::video::PollConfig;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_REPLICATE_BASE_URL: &str = "https://api.replicate.com";
pub const DEFAULT_VERTEX_BASE_URL: &str = "https://aiplatform.googleapis.com";

/// Credentials and endpoints for the prompt and video vendors.
#[derive(Clone)]
pub struct GenerationConfig {
    /// OpenAI API key (prompt generation)
    pub openai_api_key: String,
    /// Gemini API key (Veo 2)
    pub gemini_api_key: String,
    /// Replicate API token (Veo 3 on Replicate)
    pub replicate_api_key: String,
    /// Vertex AI access token (Veo 3 on Vertex)
    pub vertex_access_token: String,
    /// Google Cloud project for Vertex AI
    pub google_project_id: String,
    /// Vertex AI region
    pub vertex_location: String,
    /// Active video provider
    pub provider: VideoProvider,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    pub replicate_base_url: String,
    pub vertex_base_url: String,
    /// Long-running operation polling
    pub poll: PollConfig,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            gemini_api_key: String::new(),
            replicate_api_key: String::new(),
            vertex_access_token: String::new(),
            google_project_id: String::new(),
            vertex_location: "us-central1".to_string(),
            provider: VideoProvider::default(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            replicate_base_url: DEFAULT_REPLICATE_BASE_URL.to_string(),
            vertex_base_url: DEFAULT_VERTEX_BASE_URL.to_string(),
            poll: PollConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("google_project_id", &self.google_project_id)
            .field("vertex_location", &self.vertex_location)
            .field("poll", &self.poll)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl GenerationConfig {
    /// Create config from environment variables.
    pub fn from_env() -> GenerationResult<Self> {
        let defaults = Self::default();

        let provider = env_or("VIDEO_PROVIDER", VideoProvider::default().as_str())
            .parse::<VideoProvider>()
            .map_err(|e| GenerationError::config_error(e.to_string()))?;

        Ok(Self {
            openai_api_key: env_or("OPENAI_API_KEY", ""),
            gemini_api_key: env_or("GEMINI_API_KEY", ""),
            replicate_api_key: env_or("REPLICATE_API_KEY", ""),
            vertex_access_token: env_or("VERTEX_API_KEY", ""),
            google_project_id: env_or("GOOGLE_PROJECT_ID", ""),
            vertex_location: env_or("VERTEX_LOCATION", &defaults.vertex_location),
            provider,
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            gemini_base_url: env_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            replicate_base_url: env_or("REPLICATE_BASE_URL", DEFAULT_REPLICATE_BASE_URL),
            vertex_base_url: env_or("VERTEX_BASE_URL", DEFAULT_VERTEX_BASE_URL),
            poll: PollConfig {
                max_attempts: std::env::var("VIDEO_POLL_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.poll.max_attempts),
                interval: Duration::from_secs(
                    std::env::var("VIDEO_POLL_INTERVAL_SECS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(defaults.poll.interval.as_secs()),
                ),
            },
            request_timeout: Duration::from_secs(
                std::env::var("VENDOR_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }

    /// Environment variables the active provider needs, with descriptions
    /// and their configured values.
    fn required(&self) -> Vec<(&'static str, &'static str, &str)> {
        let mut required = vec![(
            "OPENAI_API_KEY",
            "OpenAI API key for prompt generation",
            self.openai_api_key.as_str(),
        )];

        match self.provider {
            VideoProvider::Veo2 => required.push((
                "GEMINI_API_KEY",
                "Gemini API key for Veo 2 video generation",
                self.gemini_api_key.as_str(),
            )),
            VideoProvider::Veo3Replicate => required.push((
                "REPLICATE_API_KEY",
                "Replicate API key for Veo 3 video generation",
                self.replicate_api_key.as_str(),
            )),
            VideoProvider::Veo3Vertex => {
                required.push((
                    "VERTEX_API_KEY",
                    "Vertex AI access token for Veo 3 video generation",
                    self.vertex_access_token.as_str(),
                ));
                required.push((
                    "GOOGLE_PROJECT_ID",
                    "Google Cloud project ID for Vertex AI",
                    self.google_project_id.as_str(),
                ));
            }
        }

        required
    }

    /// Names of the environment variables the active provider needs.
    pub fn required_env_vars(&self) -> Vec<&'static str> {
        self.required().into_iter().map(|(name, _, _)| name).collect()
    }

    /// Fail with every missing variable listed, one per line.
    pub fn validate(&self) -> GenerationResult<()> {
        let missing: Vec<String> = self
            .required()
            .into_iter()
            .filter(|(_, _, value)| value.trim().is_empty())
            .map(|(name, description, _)| format!("  {}: {}", name, description))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        Err(GenerationError::config_error(format!(
            "missing required environment variables:\n{}\n\nPlease set these in your .env file",
            missing.join("\n")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.provider, VideoProvider::Veo2);
        assert_eq!(config.vertex_location, "us-central1");
        assert_eq!(config.poll.max_attempts, 30);
        assert_eq!(config.poll.interval, Duration::from_secs(10));
    }

    #[test]
    fn test_required_vars_follow_provider() {
        let mut config = GenerationConfig::default();
        assert_eq!(config.required_env_vars(), vec!["OPENAI_API_KEY", "GEMINI_API_KEY"]);

        config.provider = VideoProvider::Veo3Replicate;
        assert_eq!(config.required_env_vars(), vec!["OPENAI_API_KEY", "REPLICATE_API_KEY"]);

        config.provider = VideoProvider::Veo3Vertex;
        assert_eq!(
            config.required_env_vars(),
            vec!["OPENAI_API_KEY", "VERTEX_API_KEY", "GOOGLE_PROJECT_ID"]
        );
    }

    #[test]
    fn test_validate_lists_every_missing_var() {
        let config = GenerationConfig {
            provider: VideoProvider::Veo3Vertex,
            vertex_access_token: "token".to_string(),
            ..Default::default()
        };

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("OPENAI_API_KEY"));
        assert!(err.contains("GOOGLE_PROJECT_ID"));
        assert!(!err.contains("VERTEX_API_KEY"));
    }

    #[test]
    fn test_validate_passes_with_credentials() {
        let config = GenerationConfig {
            openai_api_key: "sk-test".to_string(),
            gemini_api_key: "gm-test".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_hides_keys() {
        let config = GenerationConfig {
            openai_api_key: "sk-secret".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_provider_and_polling() {
        std::env::set_var("VIDEO_PROVIDER", "veo3-replicate");
        std::env::set_var("VIDEO_POLL_MAX_ATTEMPTS", "5");
        std::env::set_var("REPLICATE_BASE_URL", "http://localhost:9999");

        let config = GenerationConfig::from_env().unwrap();
        assert_eq!(config.provider, VideoProvider::Veo3Replicate);
        assert_eq!(config.poll.max_attempts, 5);
        assert_eq!(config.replicate_base_url, "http://localhost:9999");

        std::env::remove_var("VIDEO_PROVIDER");
        std::env::remove_var("VIDEO_POLL_MAX_ATTEMPTS");
        std::env::remove_var("REPLICATE_BASE_URL");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_provider() {
        std::env::set_var("VIDEO_PROVIDER", "sora");
        let result = GenerationConfig::from_env();
        std::env::remove_var("VIDEO_PROVIDER");

        assert!(matches!(result, Err(GenerationError::Config(_))));
    }
}
