//! LLM Integration
//!
//! The seam between the gate and whatever model backend writes and scores content.

#![warn(missing_docs)]

pub mod client;
pub mod ollama;
pub mod scripted;
pub mod json;

pub use client::{LlmClient, CompletionRequest, LlmError};
pub use ollama::OllamaClient;
pub use scripted::ScriptedClient;
pub use json::extract_json;
