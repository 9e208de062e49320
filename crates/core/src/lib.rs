//! ContentGate core data models.
//!
//! This crate defines the data structures shared by the Guardian, the
//! Critic and the improvement loop.

#![warn(missing_docs)]

// Identities
mod id;

// Briefs and context
mod content;

// Gate stages
mod guardian;
mod rubric;
mod critique;
mod review;

// Configuration
mod config;

// Re-exports
pub use id::*;

pub use content::{ContentType, ContentBrief, IcpProfile, BrandVoice, BusinessContext};
pub use guardian::{
    Severity, ViolationType, Violation, RiskLevel, GuardianRecommendation,
    ScanStage, GuardianReport,
};
pub use rubric::{RubricDimension, Rubric};
pub use critique::{
    DimensionAssessment, ScorerOutput, DimensionScore, ApprovalRecommendation, CriticReview,
};
pub use review::{
    SafetyVerdict, SafetyReport, ImprovementIteration, StopReason, ImprovementOutcome,
};
pub use config::{
    GateConfig, GuardianConfig, CustomRuleSpec, CriticConfig, ImproveConfig, LlmConfig,
};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Error parsing a model value from text.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No variant matched
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// What was being parsed
        kind: &'static str,
        /// The rejected input
        value: String,
    },
}
