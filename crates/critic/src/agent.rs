//! Critic agent.

use contentgate_core::{
    ContentBrief, CriticConfig, CriticReview, ReviewId, Rubric, RubricDimension, ScorerOutput,
};
use contentgate_llm::{CompletionRequest, LlmClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::parse::parse_scorer_output;
use crate::prompt::{build_critique_prompt, CRITIC_SYSTEM_PROMPT};
use crate::synthesis::{overall_score, recommend, synthesize};
use crate::CriticError;

/// Attempts per scorer before it is dropped from the review.
const SCORER_ATTEMPTS: usize = 2;

/// Scores content with up to two LLM scorers and synthesizes one review.
pub struct CriticAgent {
    primary: Arc<dyn LlmClient>,
    secondary: Option<Arc<dyn LlmClient>>,
    rubric: Rubric,
    config: CriticConfig,
    temperature: f32,
}

impl CriticAgent {
    /// Create a critic. Without a secondary scorer the primary scores alone.
    pub fn new(
        primary: Arc<dyn LlmClient>,
        secondary: Option<Arc<dyn LlmClient>>,
        config: CriticConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            rubric: config.rubric(),
            config,
            temperature: 0.2,
        }
    }

    /// Set the scoring temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Rubric in use.
    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Configuration in use.
    pub fn config(&self) -> &CriticConfig {
        &self.config
    }

    /// Review content against the rubric.
    ///
    /// Both scorers run concurrently. A scorer that keeps failing is dropped
    /// with a warning; the review fails only when every scorer failed.
    pub async fn review(&self, content: &str, brief: &ContentBrief) -> Result<CriticReview, CriticError> {
        if content.trim().is_empty() {
            return Err(CriticError::EmptyContent);
        }

        let request = CompletionRequest::new(build_critique_prompt(content, brief, &self.rubric))
            .with_system(CRITIC_SYSTEM_PROMPT)
            .with_temperature(self.temperature)
            .expect_json();

        let results = match &self.secondary {
            Some(secondary) => {
                let (first, second) = tokio::join!(
                    self.score_with(self.primary.as_ref(), &request),
                    self.score_with(secondary.as_ref(), &request)
                );
                vec![first, second]
            }
            None => vec![self.score_with(self.primary.as_ref(), &request).await],
        };

        let mut outputs = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(output) => outputs.push(output),
                Err(e) => {
                    warn!("Dropping scorer: {}", e);
                    failures.push(e);
                }
            }
        }
        if outputs.is_empty() {
            return Err(CriticError::AllScorersFailed(failures));
        }

        self.build_review(&outputs)
    }

    /// Build a review from already-collected scorer outputs.
    pub fn build_review(&self, outputs: &[ScorerOutput]) -> Result<CriticReview, CriticError> {
        let dimensions = synthesize(outputs);
        let overall = overall_score(&dimensions, &self.rubric).ok_or(CriticError::NoScores)?;

        let missing_dimensions: Vec<RubricDimension> = RubricDimension::ALL
            .into_iter()
            .filter(|d| !dimensions.iter().any(|s| s.dimension == *d))
            .collect();

        let high_disagreement: Vec<RubricDimension> = dimensions
            .iter()
            .filter(|d| d.scorer_scores.len() > 1 && d.disagreement >= self.config.disagreement_threshold)
            .map(|d| d.dimension)
            .collect();

        let decision = recommend(overall, &dimensions, &missing_dimensions, &self.config);

        info!(
            "Critic review: {:.1}/100 from {} scorer(s), {:?}",
            overall,
            outputs.len(),
            decision.recommendation
        );
        if !missing_dimensions.is_empty() {
            debug!("Unscored dimensions: {:?}", missing_dimensions);
        }

        Ok(CriticReview {
            id: ReviewId::new(),
            overall_score: overall,
            dimensions,
            missing_dimensions,
            critical_failures: decision.critical_failures,
            high_disagreement,
            recommendation: decision.recommendation,
            scorers: outputs.iter().map(|o| o.scorer.clone()).collect(),
            summaries: outputs.iter().filter_map(|o| o.summary.clone()).collect(),
            reviewed_at: chrono::Utc::now(),
        })
    }

    async fn score_with(
        &self,
        client: &dyn LlmClient,
        request: &CompletionRequest,
    ) -> Result<ScorerOutput, CriticError> {
        let mut last_error = None;

        for attempt in 1..=SCORER_ATTEMPTS {
            let reply = match client.complete(request).await {
                Ok(reply) => reply,
                Err(e) => {
                    debug!("{} attempt {} failed: {}", client.model(), attempt, e);
                    last_error = Some(CriticError::Llm {
                        scorer: client.model().to_string(),
                        source: e,
                    });
                    continue;
                }
            };

            match parse_scorer_output(client.model(), &reply) {
                Ok(output) => return Ok(output),
                Err(e) => {
                    debug!("{} attempt {} unparseable: {}", client.model(), attempt, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CriticError::NoScores))
    }
}
