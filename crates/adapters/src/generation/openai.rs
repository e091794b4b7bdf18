//! OpenAI chat completions and image generation adapter

use async_trait::async_trait;
use gazette_domain::{ContentGenerator, GenerationError};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GenerationConfig, SYSTEM_PROMPT, article_prompt};

/// OpenAI generator; each call is attempted once
pub struct OpenAiGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: GenerationConfig,
}

impl OpenAiGenerator {
    pub fn new(api_key: SecretString, config: GenerationConfig) -> Result<Self, GenerationError> {
        Self::with_base_url(api_key, "https://api.openai.com/v1".to_string(), config)
    }

    pub fn with_base_url(
        api_key: SecretString,
        base_url: String,
        config: GenerationConfig,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            config,
        })
    }

    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, GenerationError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::Api(e.to_string())
                }
            })?;

        if response.status() == 429 {
            return Err(GenerationError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u32,
    size: String,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

#[async_trait]
impl ContentGenerator for OpenAiGenerator {
    async fn generate_article(&self, topic: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: article_prompt(topic),
                },
            ],
        };

        let response: ChatResponse = self
            .post("chat/completions", &request)
            .await?
            .json()
            .await
            .map_err(|e| GenerationError::InvalidFormat(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GenerationError::InvalidFormat("Empty completion".to_string()))?;

        tracing::debug!(topic = %topic, chars = content.len(), "Article text generated");
        Ok(content)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ImageRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.config.image_size.clone(),
        };

        let response: ImageResponse = self
            .post("images/generations", &request)
            .await?
            .json()
            .await
            .map_err(|e| GenerationError::InvalidFormat(e.to_string()))?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .ok_or_else(|| GenerationError::InvalidFormat("No image URL in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer) -> OpenAiGenerator {
        OpenAiGenerator::with_base_url(
            SecretString::new("test-key".into()),
            server.uri(),
            GenerationConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_article_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": "Write a blog article about: Remote Work" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "# Remote Work\nBody" } }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let text = generator(&mock_server)
            .generate_article("Remote Work")
            .await
            .unwrap();

        assert_eq!(text, "# Remote Work\nBody");
    }

    #[tokio::test]
    async fn test_empty_completion_is_invalid() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&mock_server)
            .await;

        let result = generator(&mock_server).generate_article("Topic").await;

        assert!(matches!(result, Err(GenerationError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_rate_limited_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = generator(&mock_server).generate_article("Topic").await;

        assert!(matches!(result, Err(GenerationError::RateLimited)));
    }

    #[tokio::test]
    async fn test_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
            .mount(&mock_server)
            .await;

        let result = generator(&mock_server).generate_image("A city").await;

        assert!(matches!(result, Err(GenerationError::Api(_))));
    }

    #[tokio::test]
    async fn test_generate_image_returns_first_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "created": 1,
                "data": [{ "url": "https://images.example/generated.png" }]
            })))
            .mount(&mock_server)
            .await;

        let url = generator(&mock_server)
            .generate_image("A city")
            .await
            .unwrap();

        assert_eq!(url, "https://images.example/generated.png");
    }
}
