//! Stub generator for testing and offline mode

use async_trait::async_trait;
use gazette_domain::{ContentGenerator, GenerationError};

/// Stub generator that returns canned text or a configured error
pub struct StubGenerator {
    image_url: Option<String>,
    error: Option<GenerationError>,
}

impl StubGenerator {
    /// Articles are a heading plus one paragraph about the topic; no images
    pub fn new() -> Self {
        Self {
            image_url: None,
            error: None,
        }
    }

    /// Also return this URL for every image request
    pub fn with_image(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            error: None,
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: GenerationError) -> Self {
        Self {
            image_url: None,
            error: Some(error),
        }
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate_article(&self, topic: &str) -> Result<String, GenerationError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        Ok(format!(
            "# {topic}\n\n## Introduction\nCet article hors ligne présente {topic}.\n\nMerci de votre lecture."
        ))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, GenerationError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        self.image_url
            .clone()
            .ok_or_else(|| GenerationError::Config("Stub generator has no image".to_string()))
    }
}
