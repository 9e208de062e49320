//! Guardian
//!
//! Deterministic safety rules: prompt-injection detection, policy checks,
//! risk aggregation.

#![warn(missing_docs)]

pub mod rules;
pub mod registry;
pub mod scoring;
pub mod engine;

pub use rules::{Rule, builtin_rules};
pub use registry::RuleRegistry;
pub use scoring::{compliance_score, recommend};
pub use engine::Guardian;

/// Errors building a Guardian.
#[derive(Debug, thiserror::Error)]
pub enum GuardianError {
    /// A rule pattern failed to compile
    #[error("invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        /// Rule identifier
        rule: String,
        /// Regex compile error
        #[source]
        source: regex::Error,
    },

    /// Two rules share an identifier
    #[error("duplicate rule id: {0}")]
    DuplicateRule(String),
}
