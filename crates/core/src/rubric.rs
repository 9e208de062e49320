//! The fixed evaluation rubric.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the ten rubric dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricDimension {
    Clarity,
    BrandAlignment,
    AudienceRelevance,
    Engagement,
    FactualAccuracy,
    Grammar,
    Persuasiveness,
    Originality,
    Structure,
    CallToAction,
}

impl RubricDimension {
    /// Every dimension, in rubric order.
    pub const ALL: [RubricDimension; 10] = [
        RubricDimension::Clarity,
        RubricDimension::BrandAlignment,
        RubricDimension::AudienceRelevance,
        RubricDimension::Engagement,
        RubricDimension::FactualAccuracy,
        RubricDimension::Grammar,
        RubricDimension::Persuasiveness,
        RubricDimension::Originality,
        RubricDimension::Structure,
        RubricDimension::CallToAction,
    ];

    /// Stable snake_case key, as used in scorer JSON.
    pub fn key(&self) -> &'static str {
        match self {
            RubricDimension::Clarity => "clarity",
            RubricDimension::BrandAlignment => "brand_alignment",
            RubricDimension::AudienceRelevance => "audience_relevance",
            RubricDimension::Engagement => "engagement",
            RubricDimension::FactualAccuracy => "factual_accuracy",
            RubricDimension::Grammar => "grammar",
            RubricDimension::Persuasiveness => "persuasiveness",
            RubricDimension::Originality => "originality",
            RubricDimension::Structure => "structure",
            RubricDimension::CallToAction => "call_to_action",
        }
    }

    /// What a scorer should judge for this dimension.
    pub fn description(&self) -> &'static str {
        match self {
            RubricDimension::Clarity => "Is the message easy to follow on first read?",
            RubricDimension::BrandAlignment => "Does the tone and vocabulary match the brand voice?",
            RubricDimension::AudienceRelevance => "Does it speak to the target customer's pains and goals?",
            RubricDimension::Engagement => "Does it hold attention from the first line?",
            RubricDimension::FactualAccuracy => "Are claims accurate, supportable and free of exaggeration?",
            RubricDimension::Grammar => "Spelling, grammar and punctuation.",
            RubricDimension::Persuasiveness => "Does it build a convincing case for the reader to act?",
            RubricDimension::Originality => "Is it fresh rather than generic or cliched?",
            RubricDimension::Structure => "Is it organized appropriately for the format?",
            RubricDimension::CallToAction => "Is the next step clear and compelling?",
        }
    }

    /// Default weight in the overall score.
    pub fn default_weight(&self) -> f64 {
        match self {
            RubricDimension::BrandAlignment | RubricDimension::FactualAccuracy => 1.5,
            RubricDimension::Clarity | RubricDimension::AudienceRelevance => 1.2,
            RubricDimension::Engagement | RubricDimension::Grammar | RubricDimension::Persuasiveness => 1.0,
            RubricDimension::Originality | RubricDimension::Structure | RubricDimension::CallToAction => 0.8,
        }
    }

    /// A low score on a critical dimension rejects the content outright.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            RubricDimension::FactualAccuracy | RubricDimension::BrandAlignment | RubricDimension::Grammar
        )
    }

    /// Resolve a scorer-supplied key, tolerating common spellings.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_lowercase().replace(['-', ' '], "_");
        if let Some(dim) = Self::ALL.into_iter().find(|d| d.key() == normalized) {
            return Some(dim);
        }
        match normalized.as_str() {
            "brand" | "brand_voice" | "brand_consistency" => Some(RubricDimension::BrandAlignment),
            "audience" | "relevance" | "icp_relevance" | "audience_fit" => Some(RubricDimension::AudienceRelevance),
            "accuracy" | "factuality" | "facts" => Some(RubricDimension::FactualAccuracy),
            "grammar_and_spelling" | "spelling" | "mechanics" => Some(RubricDimension::Grammar),
            "persuasion" => Some(RubricDimension::Persuasiveness),
            "cta" | "call_to_action_strength" => Some(RubricDimension::CallToAction),
            "organization" | "flow" => Some(RubricDimension::Structure),
            _ => None,
        }
    }
}

impl std::fmt::Display for RubricDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for RubricDimension {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| crate::ParseError::UnknownVariant {
            kind: "rubric dimension",
            value: s.to_string(),
        })
    }
}

/// Weighted rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    weights: BTreeMap<RubricDimension, f64>,
}

impl Rubric {
    /// Rubric with default weights.
    pub fn new() -> Self {
        Self {
            weights: RubricDimension::ALL
                .into_iter()
                .map(|d| (d, d.default_weight()))
                .collect(),
        }
    }

    /// Apply weight overrides. Negative or non-finite overrides are ignored.
    pub fn with_overrides(mut self, overrides: &BTreeMap<RubricDimension, f64>) -> Self {
        for (dim, weight) in overrides {
            if weight.is_finite() && *weight >= 0.0 {
                self.weights.insert(*dim, *weight);
            }
        }
        self
    }

    /// Weight of a dimension.
    pub fn weight(&self, dimension: RubricDimension) -> f64 {
        self.weights
            .get(&dimension)
            .copied()
            .unwrap_or_else(|| dimension.default_weight())
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Dimensions and weights in rubric order.
    pub fn iter(&self) -> impl Iterator<Item = (RubricDimension, f64)> + '_ {
        RubricDimension::ALL.into_iter().map(|d| (d, self.weight(d)))
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rubric_weights() {
        let rubric = Rubric::new();
        assert_eq!(rubric.weight(RubricDimension::FactualAccuracy), 1.5);
        assert_eq!(rubric.weight(RubricDimension::CallToAction), 0.8);
        assert!((rubric.total_weight() - 10.8).abs() < 1e-9);
    }

    #[test]
    fn test_critical_dimensions() {
        let critical: Vec<_> = RubricDimension::ALL
            .into_iter()
            .filter(|d| d.is_critical())
            .collect();
        assert_eq!(
            critical,
            vec![
                RubricDimension::BrandAlignment,
                RubricDimension::FactualAccuracy,
                RubricDimension::Grammar
            ]
        );
    }

    #[test]
    fn test_from_key_aliases() {
        assert_eq!(RubricDimension::from_key("CTA"), Some(RubricDimension::CallToAction));
        assert_eq!(RubricDimension::from_key("brand-alignment"), Some(RubricDimension::BrandAlignment));
        assert_eq!(RubricDimension::from_key("Factual Accuracy"), Some(RubricDimension::FactualAccuracy));
        assert_eq!(RubricDimension::from_key("vibes"), None);
    }

    #[test]
    fn test_overrides_ignore_invalid_weights() {
        let mut overrides = BTreeMap::new();
        overrides.insert(RubricDimension::Originality, 2.0);
        overrides.insert(RubricDimension::Grammar, -1.0);
        overrides.insert(RubricDimension::Clarity, f64::NAN);
        let rubric = Rubric::new().with_overrides(&overrides);
        assert_eq!(rubric.weight(RubricDimension::Originality), 2.0);
        assert_eq!(rubric.weight(RubricDimension::Grammar), 1.0);
        assert_eq!(rubric.weight(RubricDimension::Clarity), 1.2);
    }
}
