//! Content generation provider adapters

pub mod openai;
pub mod stub;

pub use openai::OpenAiGenerator;
pub use stub::StubGenerator;

use serde::{Deserialize, Serialize};

/// Common generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Chat model used for article text
    pub model: String,
    /// Image model used for illustrations
    pub image_model: String,
    /// Requested image size, e.g. "1024x1024"
    pub image_size: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            timeout_secs: 60,
        }
    }
}

pub(crate) const SYSTEM_PROMPT: &str =
    "You are a professional blog writer. Write an engaging article in markdown format.";

pub(crate) fn article_prompt(topic: &str) -> String {
    format!("Write a blog article about: {}", topic)
}
