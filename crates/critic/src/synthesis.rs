//! Score synthesis and approval.

use contentgate_core::{
    ApprovalRecommendation, CriticConfig, DimensionScore, Rubric, RubricDimension, ScorerOutput,
};

/// Merge scorer outputs into one score per dimension.
///
/// Each dimension gets the mean of the scorers that scored it. Dimensions no
/// scorer returned are left out. Output is in rubric order.
pub fn synthesize(outputs: &[ScorerOutput]) -> Vec<DimensionScore> {
    RubricDimension::ALL
        .into_iter()
        .filter_map(|dimension| {
            let assessments: Vec<_> = outputs
                .iter()
                .filter_map(|o| o.assessments.get(&dimension))
                .collect();
            if assessments.is_empty() {
                return None;
            }

            let scorer_scores: Vec<f64> = assessments.iter().map(|a| a.score).collect();
            let mean = scorer_scores.iter().sum::<f64>() / scorer_scores.len() as f64;
            let max = scorer_scores.iter().copied().fold(f64::MIN, f64::max);
            let min = scorer_scores.iter().copied().fold(f64::MAX, f64::min);

            Some(DimensionScore {
                dimension,
                score: mean,
                disagreement: max - min,
                issues: merge(assessments.iter().map(|a| a.issues.as_slice())),
                suggestions: merge(assessments.iter().map(|a| a.suggestions.as_slice())),
                scorer_scores,
            })
        })
        .collect()
}

/// `10 * Σ(wᵢ·sᵢ) / Σwᵢ` over the scored dimensions, 0-100.
///
/// `None` when nothing with a positive weight was scored.
pub fn overall_score(dimensions: &[DimensionScore], rubric: &Rubric) -> Option<f64> {
    let (weighted, total) = dimensions.iter().fold((0.0, 0.0), |(weighted, total), d| {
        let w = rubric.weight(d.dimension);
        (weighted + w * d.score, total + w)
    });
    (total > 0.0).then(|| 10.0 * weighted / total)
}

/// Critic decision plus the critical dimensions that forced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Decision
    pub recommendation: ApprovalRecommendation,

    /// Critical dimensions below the floor
    pub critical_failures: Vec<RubricDimension>,
}

/// Approval bands, with the critical-dimension override.
///
/// At or above `approve_threshold` approves, at or above `revise_threshold`
/// approves with revisions, anything lower rejects. A critical dimension
/// below `critical_floor` rejects regardless of the overall score. An
/// unscored critical dimension caps the result at approve-with-revisions.
pub fn recommend(
    overall: f64,
    dimensions: &[DimensionScore],
    missing: &[RubricDimension],
    config: &CriticConfig,
) -> Recommendation {
    let critical_failures: Vec<RubricDimension> = dimensions
        .iter()
        .filter(|d| d.dimension.is_critical() && d.score < config.critical_floor)
        .map(|d| d.dimension)
        .collect();

    let recommendation = if !critical_failures.is_empty() {
        ApprovalRecommendation::Reject
    } else if overall >= config.approve_threshold {
        if missing.iter().any(|d| d.is_critical()) {
            ApprovalRecommendation::ApproveWithRevisions
        } else {
            ApprovalRecommendation::Approve
        }
    } else if overall >= config.revise_threshold {
        ApprovalRecommendation::ApproveWithRevisions
    } else {
        ApprovalRecommendation::Reject
    };

    Recommendation {
        recommendation,
        critical_failures,
    }
}

/// Concatenate lists, dropping case-insensitive duplicates.
fn merge<'a>(lists: impl Iterator<Item = &'a [String]>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for item in lists.flatten() {
        let key = item.trim().to_lowercase();
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(item.trim().to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgate_core::DimensionAssessment;
    use std::collections::BTreeMap;

    fn output(scorer: &str, scores: &[(RubricDimension, f64, &[&str])]) -> ScorerOutput {
        let assessments: BTreeMap<_, _> = scores
            .iter()
            .map(|(d, s, issues)| {
                (
                    *d,
                    DimensionAssessment {
                        score: *s,
                        issues: issues.iter().map(|i| i.to_string()).collect(),
                        suggestions: vec![],
                    },
                )
            })
            .collect();
        ScorerOutput {
            scorer: scorer.to_string(),
            assessments,
            summary: None,
        }
    }

    fn uniform(score: f64) -> Vec<DimensionScore> {
        RubricDimension::ALL
            .into_iter()
            .map(|dimension| DimensionScore {
                dimension,
                score,
                scorer_scores: vec![score],
                disagreement: 0.0,
                issues: vec![],
                suggestions: vec![],
            })
            .collect()
    }

    #[test]
    fn test_synthesize_averages_and_merges() {
        let a = output("a", &[
            (RubricDimension::Clarity, 8.0, &["Long intro", "jargon"]),
            (RubricDimension::Grammar, 9.0, &[]),
        ]);
        let b = output("b", &[
            (RubricDimension::Clarity, 6.0, &["long intro", "no subheads"]),
            (RubricDimension::Engagement, 7.0, &[]),
        ]);

        let dims = synthesize(&[a, b]);
        assert_eq!(dims.len(), 3);

        let clarity = &dims[0];
        assert_eq!(clarity.dimension, RubricDimension::Clarity);
        assert_eq!(clarity.score, 7.0);
        assert_eq!(clarity.scorer_scores, vec![8.0, 6.0]);
        assert_eq!(clarity.disagreement, 2.0);
        assert_eq!(clarity.issues, vec!["Long intro", "jargon", "no subheads"]);

        // Rubric order: clarity, engagement, grammar.
        assert_eq!(dims[1].dimension, RubricDimension::Engagement);
        assert_eq!(dims[2].dimension, RubricDimension::Grammar);
        assert_eq!(dims[2].disagreement, 0.0);
    }

    #[test]
    fn test_overall_score_weighted() {
        let rubric = Rubric::new();
        assert!((overall_score(&uniform(8.0), &rubric).unwrap() - 80.0).abs() < 1e-9);

        // factual_accuracy (1.5) at 10 and call_to_action (0.8) at 4:
        // 10 * (15 + 3.2) / 2.3
        let dims = vec![
            DimensionScore { dimension: RubricDimension::FactualAccuracy, score: 10.0, scorer_scores: vec![10.0], disagreement: 0.0, issues: vec![], suggestions: vec![] },
            DimensionScore { dimension: RubricDimension::CallToAction, score: 4.0, scorer_scores: vec![4.0], disagreement: 0.0, issues: vec![], suggestions: vec![] },
        ];
        let expected = 10.0 * (15.0 + 3.2) / 2.3;
        assert!((overall_score(&dims, &rubric).unwrap() - expected).abs() < 1e-9);

        assert_eq!(overall_score(&[], &rubric), None);
    }

    #[test]
    fn test_approval_bands() {
        let config = CriticConfig::default();
        assert_eq!(recommend(85.0, &uniform(8.5), &[], &config).recommendation, ApprovalRecommendation::Approve);
        assert_eq!(recommend(84.9, &uniform(8.5), &[], &config).recommendation, ApprovalRecommendation::ApproveWithRevisions);
        assert_eq!(recommend(70.0, &uniform(7.0), &[], &config).recommendation, ApprovalRecommendation::ApproveWithRevisions);
        assert_eq!(recommend(69.9, &uniform(7.0), &[], &config).recommendation, ApprovalRecommendation::Reject);
    }

    #[test]
    fn test_critical_dimension_forces_reject() {
        let config = CriticConfig::default();
        let mut dims = uniform(9.5);
        for d in dims.iter_mut() {
            if d.dimension == RubricDimension::Grammar {
                d.score = 5.5;
            }
        }
        let result = recommend(93.0, &dims, &[], &config);
        assert_eq!(result.recommendation, ApprovalRecommendation::Reject);
        assert_eq!(result.critical_failures, vec![RubricDimension::Grammar]);

        // Low non-critical dimension does not force anything.
        let mut dims = uniform(9.5);
        dims[0].score = 2.0;
        assert_eq!(recommend(88.0, &dims, &[], &config).recommendation, ApprovalRecommendation::Approve);
    }

    fn with_score(dimension: RubricDimension, score: f64) -> Vec<DimensionScore> {
        let mut dims = uniform(9.5);
        for d in dims.iter_mut().filter(|d| d.dimension == dimension) {
            d.score = score;
        }
        dims
    }

    #[test]
    fn test_every_critical_dimension_has_a_floor() {
        let config = CriticConfig::default();
        for dimension in [
            RubricDimension::FactualAccuracy,
            RubricDimension::BrandAlignment,
            RubricDimension::Grammar,
        ] {
            let result = recommend(93.0, &with_score(dimension, 5.9), &[], &config);
            assert_eq!(result.recommendation, ApprovalRecommendation::Reject, "{dimension:?}");
            assert_eq!(result.critical_failures, vec![dimension]);
        }
    }

    #[test]
    fn test_critical_floor_is_exclusive() {
        let config = CriticConfig::default();
        for dimension in [
            RubricDimension::FactualAccuracy,
            RubricDimension::BrandAlignment,
            RubricDimension::Grammar,
        ] {
            let result = recommend(90.0, &with_score(dimension, 6.0), &[], &config);
            assert_eq!(result.recommendation, ApprovalRecommendation::Approve, "{dimension:?}");
            assert!(result.critical_failures.is_empty());
        }
    }

    #[test]
    fn test_missing_critical_dimension_caps_approval() {
        let config = CriticConfig::default();
        let dims: Vec<_> = uniform(9.0)
            .into_iter()
            .filter(|d| d.dimension != RubricDimension::FactualAccuracy)
            .collect();
        let result = recommend(90.0, &dims, &[RubricDimension::FactualAccuracy], &config);
        assert_eq!(result.recommendation, ApprovalRecommendation::ApproveWithRevisions);
    }
}
