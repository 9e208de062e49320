//! Critic
//!
//! Multi-rubric content scoring: two LLM scorers, one synthesized review.

#![warn(missing_docs)]

pub mod prompt;
pub mod parse;
pub mod synthesis;
pub mod agent;

pub use prompt::{build_critique_prompt, CRITIC_SYSTEM_PROMPT};
pub use parse::parse_scorer_output;
pub use synthesis::{synthesize, overall_score, recommend, Recommendation};
pub use agent::CriticAgent;

/// Errors from a Critic review.
#[derive(Debug, thiserror::Error)]
pub enum CriticError {
    /// Nothing to review
    #[error("content is empty")]
    EmptyContent,

    /// Every scorer failed
    #[error("all scorers failed: {}", join_errors(.0))]
    AllScorersFailed(Vec<CriticError>),

    /// A scorer's LLM call failed
    #[error("scorer {scorer} failed: {source}")]
    Llm {
        /// Scorer name
        scorer: String,
        /// Underlying client error
        #[source]
        source: contentgate_llm::LlmError,
    },

    /// Scorers answered but scored no rubric dimension
    #[error("no rubric dimension was scored")]
    NoScores,

    /// A scorer reply could not be parsed
    #[error("unusable reply from {scorer}: {reason}")]
    Parse {
        /// Scorer name
        scorer: String,
        /// What was wrong
        reason: String,
    },
}

fn join_errors(errors: &[CriticError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}
