//! Guardian model - violations, risk levels and scan reports.

use serde::{Deserialize, Serialize};
use crate::Time;

/// Severity of a single violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Points deducted from the compliance score per violation.
    pub fn penalty(&self) -> f64 {
        match self {
            Severity::Low => 5.0,
            Severity::Medium => 10.0,
            Severity::High => 20.0,
            Severity::Critical => 40.0,
        }
    }
}

/// What kind of rule a violation tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    PromptInjection,
    HateSpeech,
    Violence,
    SelfHarm,
    AdultContent,
    MisleadingClaim,
    PersonalData,
    Profanity,
    BlockedTerm,
    CompetitorMention,
    ExcessiveLength,
}

impl ViolationType {
    /// Stable snake_case key.
    pub fn key(&self) -> &'static str {
        match self {
            ViolationType::PromptInjection => "prompt_injection",
            ViolationType::HateSpeech => "hate_speech",
            ViolationType::Violence => "violence",
            ViolationType::SelfHarm => "self_harm",
            ViolationType::AdultContent => "adult_content",
            ViolationType::MisleadingClaim => "misleading_claim",
            ViolationType::PersonalData => "personal_data",
            ViolationType::Profanity => "profanity",
            ViolationType::BlockedTerm => "blocked_term",
            ViolationType::CompetitorMention => "competitor_mention",
            ViolationType::ExcessiveLength => "excessive_length",
        }
    }
}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for ViolationType {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = [
            ViolationType::PromptInjection,
            ViolationType::HateSpeech,
            ViolationType::Violence,
            ViolationType::SelfHarm,
            ViolationType::AdultContent,
            ViolationType::MisleadingClaim,
            ViolationType::PersonalData,
            ViolationType::Profanity,
            ViolationType::BlockedTerm,
            ViolationType::CompetitorMention,
            ViolationType::ExcessiveLength,
        ];
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        all.into_iter()
            .find(|t| t.key() == key)
            .ok_or_else(|| crate::ParseError::UnknownVariant {
                kind: "violation type",
                value: s.to_string(),
            })
    }
}

/// A single rule hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule identifier
    pub rule: String,

    /// Violation type
    pub violation_type: ViolationType,

    /// Severity
    pub severity: Severity,

    /// Matched text
    pub matched: String,

    /// Byte offset of the first occurrence
    pub offset: usize,

    /// Explanation
    pub message: String,

    /// How to fix it
    pub suggestion: Option<String>,
}

/// Aggregate risk of a scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Aggregate violations into a risk level.
    ///
    /// Critical if any violation is critical, else high if any is high,
    /// else medium if there is any violation at all, else none.
    pub fn from_violations(violations: &[Violation]) -> Self {
        if violations.iter().any(|v| v.severity == Severity::Critical) {
            RiskLevel::Critical
        } else if violations.iter().any(|v| v.severity == Severity::High) {
            RiskLevel::High
        } else if !violations.is_empty() {
            RiskLevel::Medium
        } else {
            RiskLevel::None
        }
    }
}

/// Guardian decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardianRecommendation {
    Approve,
    Review,
    Reject,
}

/// Which side of generation a scan ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStage {
    /// Requester-supplied text before generation
    Input,
    /// Generated content
    Output,
}

/// Result of a Guardian scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianReport {
    /// Stage
    pub stage: ScanStage,

    /// Aggregate risk
    pub risk_level: RiskLevel,

    /// Compliance score, 0-100
    pub compliance_score: f64,

    /// Recommendation
    pub recommendation: GuardianRecommendation,

    /// All violations, in order of first occurrence
    pub violations: Vec<Violation>,

    /// When the scan ran
    pub checked_at: Time,
}

impl GuardianReport {
    /// Whether the scan found nothing.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations of a given type.
    pub fn violations_of(&self, violation_type: ViolationType) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .collect()
    }
}
