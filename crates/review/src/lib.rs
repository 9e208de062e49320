//! Safety review
//!
//! The two-stage gate: Guardian rules first, then the Critic.

#![warn(missing_docs)]

pub mod pipeline;
pub mod feedback;

pub use pipeline::{decide_verdict, ContentReviewer, SafetyPipeline};
pub use feedback::render_feedback;

/// Errors from a safety review.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Critic stage failed
    #[error("critic error: {0}")]
    Critic(#[from] contentgate_critic::CriticError),
}
