//! Content writers.

use async_trait::async_trait;
use contentgate_core::ContentBrief;
use contentgate_llm::{CompletionRequest, LlmClient};
use std::sync::Arc;
use tracing::debug;

use crate::templates::{build_draft_prompt, build_revision_prompt, WRITER_SYSTEM_PROMPT};
use crate::ImproveError;

/// Produces and revises content.
#[async_trait]
pub trait ContentWriter: Send + Sync {
    /// Write a first draft for a brief.
    async fn draft(&self, brief: &ContentBrief) -> Result<String, ImproveError>;

    /// Rewrite content according to review feedback.
    async fn revise(
        &self,
        brief: &ContentBrief,
        content: &str,
        feedback: &str,
    ) -> Result<String, ImproveError>;
}

/// Writer backed by an LLM.
pub struct LlmContentWriter {
    client: Arc<dyn LlmClient>,
    temperature: f32,
}

impl LlmContentWriter {
    /// Create a new writer.
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            temperature: 0.7,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    async fn generate(&self, prompt: String) -> Result<String, ImproveError> {
        let request = CompletionRequest::new(prompt)
            .with_system(WRITER_SYSTEM_PROMPT)
            .with_temperature(self.temperature);

        let text = strip_fences(&self.client.complete(&request).await?);
        if text.is_empty() {
            return Err(ImproveError::EmptyDraft);
        }
        debug!("{} wrote {} words", self.client.model(), text.split_whitespace().count());
        Ok(text)
    }
}

#[async_trait]
impl ContentWriter for LlmContentWriter {
    async fn draft(&self, brief: &ContentBrief) -> Result<String, ImproveError> {
        self.generate(build_draft_prompt(brief)).await
    }

    async fn revise(
        &self,
        brief: &ContentBrief,
        content: &str,
        feedback: &str,
    ) -> Result<String, ImproveError> {
        self.generate(build_revision_prompt(brief, content, feedback)).await
    }
}

/// Drop a surrounding markdown fence some models add anyway.
fn strip_fences(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
            body.trim_end().trim_end_matches("```").trim().to_string()
        }
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgate_core::ContentType;
    use contentgate_llm::ScriptedClient;

    #[tokio::test]
    async fn test_draft_and_revise() {
        let client = Arc::new(ScriptedClient::new("w").reply("  First draft  ").reply("```markdown\nSecond draft\n```"));
        let writer = LlmContentWriter::new(client.clone()).with_temperature(0.5);
        let brief = ContentBrief::new(ContentType::BlogPost, "Onboarding");

        assert_eq!(writer.draft(&brief).await.unwrap(), "First draft");
        assert_eq!(writer.revise(&brief, "First draft", "- issue: vague").await.unwrap(), "Second draft");

        let requests = client.requests();
        assert_eq!(requests[0].temperature, 0.5);
        assert_eq!(requests[0].system.as_deref(), Some(WRITER_SYSTEM_PROMPT));
        assert!(requests[1].prompt.contains("- issue: vague"));
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let writer = LlmContentWriter::new(Arc::new(ScriptedClient::new("w").reply("   ")));
        let brief = ContentBrief::new(ContentType::Hook, "Onboarding");
        assert!(matches!(writer.draft(&brief).await, Err(ImproveError::EmptyDraft)));
    }

    #[tokio::test]
    async fn test_llm_failure_maps_to_writer_error() {
        let writer = LlmContentWriter::new(Arc::new(ScriptedClient::new("w").fail("down")));
        let brief = ContentBrief::new(ContentType::Hook, "Onboarding");
        assert!(matches!(writer.draft(&brief).await, Err(ImproveError::Writer(_))));
    }
}
