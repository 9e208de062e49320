//! Iterative improvement
//!
//! Generate, review, revise from feedback, until the content passes or the
//! iteration cap is hit.

#![warn(missing_docs)]

pub mod templates;
pub mod writer;
pub mod improver;

pub use templates::{build_draft_prompt, build_revision_prompt, WRITER_SYSTEM_PROMPT};
pub use writer::{ContentWriter, LlmContentWriter};
pub use improver::IterativeImprover;

use contentgate_core::GuardianReport;

/// Errors from an improvement run.
#[derive(Debug, thiserror::Error)]
pub enum ImproveError {
    /// Writer model failed
    #[error("writer error: {0}")]
    Writer(#[from] contentgate_llm::LlmError),

    /// Review failed
    #[error("review error: {0}")]
    Review(#[from] contentgate_review::ReviewError),

    /// Writer returned nothing
    #[error("writer returned empty content")]
    EmptyDraft,

    /// Loop settings are unusable
    #[error("invalid improvement config: {0}")]
    InvalidConfig(String),

    /// The input guard rejected the brief
    #[error("brief rejected by input guard ({} violation(s))", .0.violations.len())]
    BriefRejected(Box<GuardianReport>),
}
