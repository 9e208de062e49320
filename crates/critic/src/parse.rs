//! Scorer reply parsing.
//!
//! Accepted shapes:
//! - `{"scores": {"clarity": {"score": 8, "issues": [..], "suggestions": [..]}, ..}}`
//! - `{"scores": {"clarity": 8, ..}}`
//! - `{"dimensions": [{"dimension": "clarity", "score": 8, ..}, ..]}`
//! - the dimension map at the top level

use contentgate_core::{DimensionAssessment, RubricDimension, ScorerOutput};
use contentgate_llm::extract_json;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use tracing::debug;

use crate::CriticError;

/// Parse a raw scorer reply.
pub fn parse_scorer_output(scorer: &str, raw: &str) -> Result<ScorerOutput, CriticError> {
    let value = extract_json(raw).map_err(|e| CriticError::Parse {
        scorer: scorer.to_string(),
        reason: e.to_string(),
    })?;

    let mut assessments = BTreeMap::new();

    if let Some(scores) = value.get("scores").and_then(|v| v.as_object()) {
        collect_map(scores, &mut assessments);
    } else if let Some(dimensions) = value.get("dimensions").and_then(|v| v.as_array()) {
        for entry in dimensions {
            let key = entry
                .get("dimension")
                .or_else(|| entry.get("name"))
                .and_then(|v| v.as_str());
            if let Some(dimension) = key.and_then(RubricDimension::from_key) {
                if let Some(assessment) = assessment(entry) {
                    assessments.insert(dimension, assessment);
                }
            }
        }
    } else if let Some(top) = value.as_object() {
        collect_map(top, &mut assessments);
    }

    if assessments.is_empty() {
        return Err(CriticError::Parse {
            scorer: scorer.to_string(),
            reason: "reply scored no rubric dimension".to_string(),
        });
    }

    let summary = value
        .get("summary")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(ScorerOutput {
        scorer: scorer.to_string(),
        assessments,
        summary,
    })
}

fn collect_map(map: &Map<String, JsonValue>, out: &mut BTreeMap<RubricDimension, DimensionAssessment>) {
    for (key, entry) in map {
        match RubricDimension::from_key(key) {
            Some(dimension) => {
                if let Some(assessment) = assessment(entry) {
                    out.insert(dimension, assessment);
                }
            }
            None if key != "summary" => debug!("Ignoring unknown rubric key '{}'", key),
            None => {}
        }
    }
}

fn assessment(entry: &JsonValue) -> Option<DimensionAssessment> {
    if let Some(score) = score(entry) {
        return Some(DimensionAssessment {
            score,
            issues: Vec::new(),
            suggestions: Vec::new(),
        });
    }

    let score = entry.get("score").and_then(score)?;
    Some(DimensionAssessment {
        score,
        issues: strings(entry.get("issues")),
        suggestions: strings(entry.get("suggestions").or_else(|| entry.get("suggestion"))),
    })
}

/// A score from a number or a numeric string such as `"7.5"` or `"8/10"`, clamped to 0-10.
fn score(value: &JsonValue) -> Option<f64> {
    let raw = match value {
        JsonValue::Number(n) => n.as_f64()?,
        JsonValue::String(s) => s.split('/').next()?.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    raw.is_finite().then(|| raw.clamp(0.0, 10.0))
}

fn strings(value: Option<&JsonValue>) -> Vec<String> {
    let items: Vec<&JsonValue> = match value {
        Some(JsonValue::Array(items)) => items.iter().collect(),
        Some(v @ JsonValue::String(_)) => vec![v],
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
