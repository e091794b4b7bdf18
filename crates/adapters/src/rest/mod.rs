//! Hosted REST gateway (PostgREST-style table API)

mod articles;
mod engagement;

use gazette_domain::GatewayError;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Gateway speaking to `{base_url}/rest/v1/{table}`
pub struct RestGateway {
    client: Client,
    base_url: String,
    api_key: SecretString,
    access_token: Option<SecretString>,
}

impl RestGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        timeout_secs: u64,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            access_token: None,
        })
    }

    /// Authenticate requests as a signed-in user instead of the anonymous key
    pub fn with_access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(token);
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let bearer = self.access_token.as_ref().unwrap_or(&self.api_key);
        self.client
            .request(method, self.table_url(table))
            .header("apikey", self.api_key.expose_secret())
            .header(
                "Authorization",
                format!("Bearer {}", bearer.expose_secret()),
            )
    }

    /// Send and decode a JSON body
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = send(request).await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Send and ignore the body
    async fn execute(&self, request: RequestBuilder) -> Result<(), GatewayError> {
        send(request).await?;
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> Result<Response, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = %status, body = %body, "Gateway request failed");
    Err(status_error(status, body))
}

fn status_error(status: StatusCode, body: String) -> GatewayError {
    match status.as_u16() {
        401 | 403 => GatewayError::Unauthorized(body),
        404 => GatewayError::NotFound(body),
        409 => GatewayError::Conflict(body),
        429 => GatewayError::RateLimited,
        _ => GatewayError::Api(format!("Gateway returned {}: {}", status, body)),
    }
}

/// PostgREST equality filter
fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const RETURN_MINIMAL: &str = "return=minimal";
