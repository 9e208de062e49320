//! Safety review and improvement-run records.

use serde::{Deserialize, Serialize};
use crate::content::ContentBrief;
use crate::critique::CriticReview;
use crate::guardian::GuardianReport;
use crate::id::{ReviewId, RunId};
use crate::Time;

/// Final verdict of the two-stage gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyVerdict {
    /// Ready to ship
    Approved,
    /// Passes, but the writer should apply the feedback
    NeedsRevision,
    /// A person has to decide
    NeedsHumanReview,
    /// Must not ship
    Rejected,
}

impl SafetyVerdict {
    /// Stable snake_case key.
    pub fn key(&self) -> &'static str {
        match self {
            SafetyVerdict::Approved => "approved",
            SafetyVerdict::NeedsRevision => "needs_revision",
            SafetyVerdict::NeedsHumanReview => "needs_human_review",
            SafetyVerdict::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for SafetyVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for SafetyVerdict {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        [
            SafetyVerdict::Approved,
            SafetyVerdict::NeedsRevision,
            SafetyVerdict::NeedsHumanReview,
            SafetyVerdict::Rejected,
        ]
        .into_iter()
        .find(|v| v.key() == key)
        .ok_or_else(|| crate::ParseError::UnknownVariant {
            kind: "verdict",
            value: s.to_string(),
        })
    }
}

/// Outcome of running content through the Guardian and the Critic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyReport {
    /// Unique identifier
    pub id: ReviewId,

    /// Reviewed content
    pub content: String,

    /// Guardian stage
    pub guardian: GuardianReport,

    /// Critic stage; absent when the Guardian rejected
    pub critic: Option<CriticReview>,

    /// Final verdict
    pub verdict: SafetyVerdict,

    /// Critic overall score, or 0 when the Critic was skipped
    pub score: f64,

    /// When the review completed
    pub created_at: Time,
}

impl SafetyReport {
    /// Whether the content can ship as is.
    pub fn approved(&self) -> bool {
        self.verdict == SafetyVerdict::Approved
    }
}

/// One pass of the improvement loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementIteration {
    /// 1-based iteration number
    pub iteration: u32,

    /// Content reviewed in this pass
    pub content: String,

    /// Score of that content
    pub score: f64,

    /// Verdict of that content
    pub verdict: SafetyVerdict,

    /// Feedback handed to the writer for the next pass
    pub feedback: String,

    /// Full review
    pub report: SafetyReport,
}

/// Why the improvement loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Score reached the target
    TargetReached,
    /// The gate approved the content
    Approved,
    /// The iteration cap was hit
    MaxIterations,
}

/// Result of an improvement run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementOutcome {
    /// Unique identifier
    pub id: RunId,

    /// Brief the run wrote against
    pub brief: ContentBrief,

    /// Content after the last pass
    pub final_content: String,

    /// Score after the last pass
    pub final_score: f64,

    /// Verdict after the last pass
    pub final_verdict: SafetyVerdict,

    /// Number of review passes performed
    pub iterations: u32,

    /// Why the loop stopped
    pub stop_reason: StopReason,

    /// Every pass, in order
    pub history: Vec<ImprovementIteration>,

    /// When the run started
    pub started_at: Time,

    /// When the run finished
    pub finished_at: Time,
}

impl ImprovementOutcome {
    /// Whether the loop ended on a passing pass.
    pub fn converged(&self) -> bool {
        self.stop_reason != StopReason::MaxIterations
    }

    /// The highest-scoring pass.
    pub fn best_iteration(&self) -> Option<&ImprovementIteration> {
        self.history
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_parse_and_display() {
        assert_eq!("needs-human-review".parse::<SafetyVerdict>().unwrap(), SafetyVerdict::NeedsHumanReview);
        assert_eq!(SafetyVerdict::Rejected.to_string(), "rejected");
        assert!("maybe".parse::<SafetyVerdict>().is_err());
    }

    #[test]
    fn test_verdict_serde_is_snake_case() {
        let json = serde_json::to_string(&SafetyVerdict::NeedsRevision).unwrap();
        assert_eq!(json, "\"needs_revision\"");
    }
}
