//! Critic model - per-scorer assessments and the synthesized review.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::id::ReviewId;
use crate::rubric::RubricDimension;
use crate::Time;

/// One scorer's view of one dimension.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionAssessment {
    /// Score, 0-10
    pub score: f64,

    /// Problems found
    #[serde(default)]
    pub issues: Vec<String>,

    /// Suggested fixes
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Everything one scorer returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerOutput {
    /// Scorer name (model)
    pub scorer: String,

    /// Assessments by dimension
    pub assessments: BTreeMap<RubricDimension, DimensionAssessment>,

    /// Free-text summary
    pub summary: Option<String>,
}

/// Synthesized score for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    /// Dimension
    pub dimension: RubricDimension,

    /// Mean of the scorers' scores, 0-10
    pub score: f64,

    /// Individual scorer scores, in scorer order
    pub scorer_scores: Vec<f64>,

    /// Spread between the highest and lowest scorer score
    pub disagreement: f64,

    /// Merged issues
    pub issues: Vec<String>,

    /// Merged suggestions
    pub suggestions: Vec<String>,
}

/// Critic decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRecommendation {
    /// Overall score in the approval band
    Approve,
    /// Overall score in the revision band
    ApproveWithRevisions,
    /// Below the revision band, or a critical dimension failed
    Reject,
}

/// Result of a Critic review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticReview {
    /// Unique identifier
    pub id: ReviewId,

    /// Weighted overall score, 0-100
    pub overall_score: f64,

    /// Per-dimension scores, in rubric order
    pub dimensions: Vec<DimensionScore>,

    /// Dimensions no scorer returned
    pub missing_dimensions: Vec<RubricDimension>,

    /// Critical dimensions below the floor
    pub critical_failures: Vec<RubricDimension>,

    /// Dimensions where scorers disagreed past the threshold
    pub high_disagreement: Vec<RubricDimension>,

    /// Recommendation
    pub recommendation: ApprovalRecommendation,

    /// Scorers that contributed
    pub scorers: Vec<String>,

    /// Scorer summaries
    pub summaries: Vec<String>,

    /// When the review completed
    pub reviewed_at: Time,
}

impl CriticReview {
    /// Whether the critic approves without revisions.
    pub fn approved(&self) -> bool {
        self.recommendation == ApprovalRecommendation::Approve
    }

    /// Score of one dimension, if scored.
    pub fn score_of(&self, dimension: RubricDimension) -> Option<f64> {
        self.dimensions
            .iter()
            .find(|d| d.dimension == dimension)
            .map(|d| d.score)
    }

    /// Revision guidance, weakest dimensions first.
    pub fn feedback(&self) -> String {
        let mut weakest: Vec<&DimensionScore> = self
            .dimensions
            .iter()
            .filter(|d| d.score < 8.0 || self.critical_failures.contains(&d.dimension))
            .collect();
        weakest.sort_by(|a, b| a.score.total_cmp(&b.score));

        let mut out = format!("Overall score: {:.1}/100\n", self.overall_score);
        if weakest.is_empty() {
            out.push_str("No dimension scored below 8; polish only.\n");
            return out;
        }

        for dim in weakest {
            out.push_str(&format!("\n{} ({:.1}/10)", dim.dimension, dim.score));
            if self.critical_failures.contains(&dim.dimension) {
                out.push_str(" [must fix]");
            }
            out.push('\n');
            for issue in &dim.issues {
                out.push_str(&format!("- issue: {}\n", issue));
            }
            for suggestion in &dim.suggestions {
                out.push_str(&format!("- fix: {}\n", suggestion));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(dimension: RubricDimension, score: f64, issue: &str) -> DimensionScore {
        DimensionScore {
            dimension,
            score,
            scorer_scores: vec![score],
            disagreement: 0.0,
            issues: vec![issue.to_string()],
            suggestions: vec![],
        }
    }

    fn review(dimensions: Vec<DimensionScore>) -> CriticReview {
        CriticReview {
            id: ReviewId::new(),
            overall_score: 72.0,
            dimensions,
            missing_dimensions: vec![],
            critical_failures: vec![RubricDimension::Grammar],
            high_disagreement: vec![],
            recommendation: ApprovalRecommendation::Reject,
            scorers: vec!["a".to_string()],
            summaries: vec![],
            reviewed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_feedback_orders_weakest_first() {
        let review = review(vec![
            dim(RubricDimension::Clarity, 7.0, "wordy intro"),
            dim(RubricDimension::Grammar, 4.0, "typos"),
            dim(RubricDimension::Engagement, 9.0, "fine"),
        ]);
        let feedback = review.feedback();
        let grammar = feedback.find("grammar").unwrap();
        let clarity = feedback.find("clarity").unwrap();
        assert!(grammar < clarity);
        assert!(feedback.contains("[must fix]"));
        assert!(!feedback.contains("engagement"));
    }

    #[test]
    fn test_score_of() {
        let review = review(vec![dim(RubricDimension::Clarity, 7.0, "x")]);
        assert_eq!(review.score_of(RubricDimension::Clarity), Some(7.0));
        assert_eq!(review.score_of(RubricDimension::Grammar), None);
        assert!(!review.approved());
    }
}
