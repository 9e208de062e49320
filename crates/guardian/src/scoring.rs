//! Policy violation scoring.

use contentgate_core::{GuardianRecommendation, RiskLevel, Violation};

/// `100 - Σ penalty`, floored at 0.
pub fn compliance_score(violations: &[Violation]) -> f64 {
    let penalty: f64 = violations.iter().map(|v| v.severity.penalty()).sum();
    (100.0 - penalty).max(0.0)
}

/// Map a risk level and compliance score to a recommendation.
///
/// Medium risk only goes to review once the compliance score drops below
/// `review_threshold`.
pub fn recommend(risk: RiskLevel, compliance: f64, review_threshold: f64) -> GuardianRecommendation {
    match risk {
        RiskLevel::Critical => GuardianRecommendation::Reject,
        RiskLevel::High => GuardianRecommendation::Review,
        RiskLevel::Medium if compliance < review_threshold => GuardianRecommendation::Review,
        RiskLevel::Medium | RiskLevel::None => GuardianRecommendation::Approve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgate_core::{Severity, ViolationType};

    fn violation(severity: Severity) -> Violation {
        Violation {
            rule: "r".to_string(),
            violation_type: ViolationType::MisleadingClaim,
            severity,
            matched: "m".to_string(),
            offset: 0,
            message: String::new(),
            suggestion: None,
        }
    }

    #[test]
    fn test_compliance_score() {
        assert_eq!(compliance_score(&[]), 100.0);
        assert_eq!(compliance_score(&[violation(Severity::Low), violation(Severity::Medium)]), 85.0);
        assert_eq!(
            compliance_score(&[violation(Severity::Critical), violation(Severity::Critical), violation(Severity::High)]),
            0.0
        );
    }

    #[test]
    fn test_recommendation_bands() {
        assert_eq!(recommend(RiskLevel::None, 100.0, 80.0), GuardianRecommendation::Approve);
        assert_eq!(recommend(RiskLevel::Medium, 90.0, 80.0), GuardianRecommendation::Approve);
        assert_eq!(recommend(RiskLevel::Medium, 75.0, 80.0), GuardianRecommendation::Review);
        assert_eq!(recommend(RiskLevel::High, 80.0, 80.0), GuardianRecommendation::Review);
        assert_eq!(recommend(RiskLevel::Critical, 60.0, 80.0), GuardianRecommendation::Reject);
    }
}
