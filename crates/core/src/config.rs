//! Gate configuration.
//!
//! Every field has a default, so a partial `config.json` loads cleanly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::guardian::{Severity, ViolationType};
use crate::rubric::{Rubric, RubricDimension};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Guardian settings
    pub guardian: GuardianConfig,

    /// Critic settings
    pub critic: CriticConfig,

    /// Improvement loop settings
    pub improve: ImproveConfig,

    /// LLM backend settings
    pub llm: LlmConfig,
}

/// Guardian settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardianConfig {
    /// Longest accepted requester input, in characters
    pub max_input_chars: usize,

    /// Medium-risk content scoring below this compliance score goes to review
    pub review_threshold: f64,

    /// Terms that are never allowed in output
    pub blocked_terms: Vec<String>,

    /// Extra rules on top of the built-in set
    pub custom_rules: Vec<CustomRuleSpec>,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 20_000,
            review_threshold: 80.0,
            blocked_terms: Vec::new(),
            custom_rules: Vec::new(),
        }
    }
}

/// User-defined Guardian rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRuleSpec {
    /// Rule identifier
    pub id: String,

    /// Regular expression
    pub pattern: String,

    /// Violation type
    pub violation_type: ViolationType,

    /// Severity
    pub severity: Severity,

    /// Explanation shown on a hit
    pub message: String,

    /// How to fix it
    #[serde(default)]
    pub suggestion: Option<String>,

    /// Also apply at the input stage
    #[serde(default)]
    pub check_input: bool,
}

/// Critic settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticConfig {
    /// Overall score at or above which content is approved
    pub approve_threshold: f64,

    /// Overall score at or above which content is approved with revisions
    pub revise_threshold: f64,

    /// Critical dimensions scoring below this force a rejection
    pub critical_floor: f64,

    /// Scorer spread at or above which a dimension is flagged
    pub disagreement_threshold: f64,

    /// Weight overrides
    pub weights: BTreeMap<RubricDimension, f64>,
}

impl CriticConfig {
    /// Rubric with this config's weight overrides applied.
    pub fn rubric(&self) -> Rubric {
        Rubric::new().with_overrides(&self.weights)
    }
}

impl Default for CriticConfig {
    fn default() -> Self {
        Self {
            approve_threshold: 85.0,
            revise_threshold: 70.0,
            critical_floor: 6.0,
            disagreement_threshold: 3.0,
            weights: BTreeMap::new(),
        }
    }
}

/// Improvement loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImproveConfig {
    /// Stop once the score reaches this, 0-100
    pub target_score: f64,

    /// Maximum review passes
    pub max_iterations: u32,
}

impl Default for ImproveConfig {
    fn default() -> Self {
        Self {
            target_score: 85.0,
            max_iterations: 3,
        }
    }
}

/// LLM backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama-compatible server URL
    pub base_url: String,

    /// Model used for writing and as the first scorer
    pub primary_model: String,

    /// Second scorer; `None` runs the Critic with one scorer
    pub secondary_model: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature for writing
    pub writer_temperature: f32,

    /// Sampling temperature for scoring
    pub critic_temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            primary_model: "llama3.1:8b".to_string(),
            secondary_model: Some("qwen2.5:7b".to_string()),
            timeout_secs: 120,
            writer_temperature: 0.7,
            critic_temperature: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GateConfig = serde_json::from_str(
            r#"{"improve": {"max_iterations": 5}, "critic": {"weights": {"grammar": 2.0}}}"#,
        )
        .unwrap();
        assert_eq!(config.improve.max_iterations, 5);
        assert_eq!(config.improve.target_score, 85.0);
        assert_eq!(config.critic.approve_threshold, 85.0);
        assert_eq!(config.critic.rubric().weight(RubricDimension::Grammar), 2.0);
        assert_eq!(config.guardian.max_input_chars, 20_000);
    }

    #[test]
    fn test_custom_rule_spec_deserializes() {
        let rule: CustomRuleSpec = serde_json::from_str(
            r#"{"id": "no-crypto", "pattern": "(?i)crypto", "violation_type": "blocked_term",
                "severity": "medium", "message": "No crypto talk"}"#,
        )
        .unwrap();
        assert_eq!(rule.severity, Severity::Medium);
        assert!(!rule.check_input);
    }
}
