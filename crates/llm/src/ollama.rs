//! Ollama generation client.
//!
//! Talks to Ollama's non-streaming `/api/generate` endpoint. Any server that
//! speaks the same API works.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::json;
use tracing::debug;

use crate::client::{CompletionRequest, LlmClient, LlmError};

/// Ollama LLM client.
#[derive(Clone)]
pub struct OllamaClient {
    /// HTTP client
    client: Client,

    /// Ollama server URL
    url: String,

    /// Model name
    model: String,
}

impl OllamaClient {
    /// Create a new Ollama client.
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_timeout(url, model, std::time::Duration::from_secs(120))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        url: impl Into<String>,
        model: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            url: url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Build the request body for `/api/generate`.
    fn payload(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut payload = json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
            "options": {
                "temperature": request.temperature,
            }
        });
        if let Some(system) = &request.system {
            payload["system"] = json!(system);
        }
        if request.json {
            payload["format"] = json!("json");
        }
        payload
    }

    /// Check if the Ollama server is reachable.
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/api/version", self.url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        debug!(
            "Generating with {} ({} prompt chars, json={})",
            self.model,
            request.prompt.len(),
            request.json
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&self.payload(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        #[derive(serde::Deserialize)]
        struct Response {
            response: String,
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        if data.response.trim().is_empty() {
            return Err(LlmError::InvalidResponse(format!(
                "{} returned an empty completion",
                self.model
            )));
        }

        Ok(data.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_includes_system_and_format() {
        let client = OllamaClient::new("http://localhost:11434/", "llama3.1:8b");
        let request = CompletionRequest::new("hi")
            .with_system("sys")
            .with_temperature(0.2)
            .expect_json();
        let payload = client.payload(&request);
        assert_eq!(payload["model"], "llama3.1:8b");
        assert_eq!(payload["system"], "sys");
        assert_eq!(payload["format"], "json");
        assert_eq!(payload["stream"], false);
        assert_eq!(client.url, "http://localhost:11434");
    }

    #[test]
    fn test_payload_plain_text() {
        let client = OllamaClient::new("http://localhost:11434", "m");
        let payload = client.payload(&CompletionRequest::new("hi"));
        assert!(payload.get("format").is_none());
        assert!(payload.get("system").is_none());
        assert_eq!(client.model(), "m");
    }

    #[tokio::test]
    async fn test_health_check_unreachable_server() {
        let client = OllamaClient::with_timeout("http://127.0.0.1:1", "m", std::time::Duration::from_secs(2));
        assert!(!client.health_check().await);
    }
}
