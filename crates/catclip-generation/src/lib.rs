//! Content generation for catclip.
//!
//! - [`PromptGenerator`]: short, absurd video prompts from an OpenAI chat model
//! - [`VideoGenerator`]: renders prompts with Veo 2 (Gemini API) or Veo 3
//!   (Replicate, Vertex AI)

pub mod config;
pub mod error;
mod http;
pub mod prompt;
pub mod video;

pub use config::GenerationConfig;
pub use error::{GenerationError, GenerationResult};
pub use prompt::PromptGenerator;
pub use video::{
    PollConfig, ReplicateBackend, Veo2Backend, VertexBackend, VideoBackend, VideoGenerator, DEFAULT_TEST_PROMPT,
};
