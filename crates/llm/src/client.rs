//! LLM client abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from an LLM backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("LLM API error (status {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Reply could not be used
    #[error("invalid LLM response: {0}")]
    InvalidResponse(String),

    /// Scripted client ran out of replies
    #[error("no scripted reply left for model {0}")]
    Exhausted(String),
}

/// A single completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System instruction
    pub system: Option<String>,

    /// User prompt
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Ask the backend to constrain output to JSON
    pub json: bool,
}

impl CompletionRequest {
    /// Create a plain-text request.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.7,
            json: false,
        }
    }

    /// Set the system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Request JSON output.
    pub fn expect_json(mut self) -> Self {
        self.json = true;
        self
    }
}

/// A model that turns prompts into text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model name, used to label scorer output.
    fn model(&self) -> &str;

    /// Run one completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}
