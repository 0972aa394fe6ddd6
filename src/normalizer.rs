//! Emotion normalization
//!
//! This module folds provider-specific emotion scores into the canonical
//! seven-category distribution.
//! - Provider vocabulary mapped onto canonical labels
//! - Colliding labels keep the strongest value
//! - Missing categories completed, then scaled to sum to 1

use crate::error::AssessError;
use crate::types::{EmotionCategory, EmotionDistribution};
use serde_json::Value;
use std::collections::HashMap;

/// Prior given to `neutral` when a provider reports no signal at all
pub const NEUTRAL_PRIOR: f64 = 0.1;

/// Normalizer for converting raw provider scores to emotion distributions
pub struct EmotionNormalizer;

impl EmotionNormalizer {
    /// Normalize a label → score map into a distribution
    pub fn normalize(raw: &HashMap<String, f64>) -> Result<EmotionDistribution, AssessError> {
        Self::normalize_pairs(raw.iter().map(|(label, score)| (label.as_str(), *score)))
    }

    /// Normalize an untyped provider payload.
    ///
    /// Accepts a JSON object of label → number, or an array of
    /// `{label, score}` pairs. Anything else is a malformed response.
    pub fn normalize_value(raw: &Value) -> Result<EmotionDistribution, AssessError> {
        match raw {
            Value::Object(map) => {
                let mut pairs = Vec::with_capacity(map.len());
                for (label, score) in map {
                    let score = score.as_f64().ok_or_else(|| {
                        AssessError::MalformedProviderResponse(format!(
                            "score for '{label}' is not a number"
                        ))
                    })?;
                    pairs.push((label.as_str(), score));
                }
                Self::normalize_pairs(pairs)
            }
            Value::Array(items) => {
                let mut pairs = Vec::with_capacity(items.len());
                for item in items {
                    let label = item.get("label").and_then(Value::as_str);
                    let score = item.get("score").and_then(Value::as_f64);
                    match (label, score) {
                        (Some(label), Some(score)) => pairs.push((label, score)),
                        _ => {
                            return Err(AssessError::MalformedProviderResponse(
                                "array entry is not a {label, score} pair".to_string(),
                            ))
                        }
                    }
                }
                Self::normalize_pairs(pairs)
            }
            other => Err(AssessError::MalformedProviderResponse(format!(
                "expected emotion mapping, got {}",
                json_kind(other)
            ))),
        }
    }

    fn normalize_pairs<'a, I>(pairs: I) -> Result<EmotionDistribution, AssessError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut values = [0.0_f64; 7];

        for (label, score) in pairs {
            if !score.is_finite() || score < 0.0 {
                return Err(AssessError::MalformedProviderResponse(format!(
                    "score for '{label}' must be a non-negative number, got {score}"
                )));
            }

            let folded = fold_label(label);
            match EmotionCategory::from_canonical(&folded) {
                Some(category) => {
                    let slot = &mut values[category.index()];
                    // Strongest signal wins on collision
                    *slot = slot.max(score);
                }
                None => {
                    tracing::debug!(label = %label, "Dropping non-canonical emotion label");
                }
            }
        }

        // Scale by the peak first so large finite scores cannot sum to infinity
        let peak = values.iter().copied().fold(0.0_f64, f64::max);
        if peak > 0.0 {
            for value in values.iter_mut() {
                *value /= peak;
            }
        }

        let mut total: f64 = values.iter().sum();
        if total <= 0.0 {
            values[EmotionCategory::Neutral.index()] = NEUTRAL_PRIOR;
            total = NEUTRAL_PRIOR;
        }

        for value in values.iter_mut() {
            *value /= total;
        }

        Ok(EmotionDistribution::from_normalized(values))
    }
}

/// Fold a provider label onto canonical vocabulary
pub fn fold_label(label: &str) -> String {
    let lower = label.trim().to_lowercase();
    match lower.as_str() {
        "anger" => "angry".to_string(),
        "joy" | "happiness" => "happy".to_string(),
        "sadness" => "sad".to_string(),
        _ => lower,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(label, score)| (label.to_string(), *score))
            .collect()
    }

    fn assert_sums_to_one(dist: &EmotionDistribution) {
        assert!((dist.total() - 1.0).abs() < 1e-9, "total was {}", dist.total());
        assert_eq!(dist.iter().count(), 7);
    }

    #[test]
    fn test_synonyms_fold_onto_canonical_labels() {
        let dist = EmotionNormalizer::normalize(&map(&[
            ("Anger", 2.0),
            ("Joy", 1.0),
            ("Sadness", 1.0),
        ]))
        .unwrap();

        assert_sums_to_one(&dist);
        assert!((dist.get(EmotionCategory::Angry) - 0.5).abs() < 1e-9);
        assert!((dist.get(EmotionCategory::Happy) - 0.25).abs() < 1e-9);
        assert!((dist.get(EmotionCategory::Sad) - 0.25).abs() < 1e-9);
        assert_eq!(dist.get(EmotionCategory::Neutral), 0.0);
    }

    #[test]
    fn test_collision_keeps_maximum() {
        let dist = EmotionNormalizer::normalize(&map(&[
            ("joy", 0.2),
            ("happiness", 0.6),
            ("neutral", 0.4),
        ]))
        .unwrap();

        // 0.6 / (0.6 + 0.4), not 0.8 / 1.2
        assert!((dist.get(EmotionCategory::Happy) - 0.6).abs() < 1e-9);
        assert!((dist.get(EmotionCategory::Neutral) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_empty_signal_becomes_neutral() {
        let dist = EmotionNormalizer::normalize(&HashMap::new()).unwrap();
        assert_sums_to_one(&dist);
        assert_eq!(dist.get(EmotionCategory::Neutral), 1.0);

        let zeros = EmotionNormalizer::normalize(&map(&[("fear", 0.0), ("sad", 0.0)])).unwrap();
        assert_eq!(zeros.get(EmotionCategory::Neutral), 1.0);
    }

    #[test]
    fn test_unbounded_scores_are_scaled() {
        let dist = EmotionNormalizer::normalize(&map(&[
            ("Neutral", 75.0),
            ("Happiness", 15.0),
            ("Sadness", 5.0),
            ("Surprise", 2.0),
            ("Fear", 1.0),
            ("Disgust", 1.0),
            ("Anger", 1.0),
        ]))
        .unwrap();

        assert_sums_to_one(&dist);
        assert!((dist.get(EmotionCategory::Neutral) - 0.75).abs() < 1e-9);
        assert_eq!(dist.dominant().0, EmotionCategory::Neutral);
    }

    #[test]
    fn test_scores_near_f64_max_still_sum_to_one() {
        let dist = EmotionNormalizer::normalize(&map(&[("happy", 1e308), ("sad", 1e308)])).unwrap();

        assert_sums_to_one(&dist);
        assert_eq!(dist.get(EmotionCategory::Happy), 0.5);
        assert_eq!(dist.get(EmotionCategory::Sad), 0.5);

        let lopsided =
            EmotionNormalizer::normalize(&map(&[("fear", f64::MAX), ("angry", 1.0)])).unwrap();
        assert_sums_to_one(&lopsided);
        assert_eq!(lopsided.dominant().0, EmotionCategory::Fear);
    }

    #[test]
    fn test_unknown_labels_are_dropped() {
        let dist = EmotionNormalizer::normalize(&map(&[("contempt", 5.0), ("fear", 1.0)])).unwrap();
        assert_eq!(dist.get(EmotionCategory::Fear), 1.0);
    }

    #[test]
    fn test_normalize_value_accepts_pair_array() {
        let raw = json!([
            {"label": "anger", "score": 0.7},
            {"label": "neutral", "score": 0.3}
        ]);
        let dist = EmotionNormalizer::normalize_value(&raw).unwrap();
        assert!((dist.get(EmotionCategory::Angry) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_payloads_are_rejected() {
        for raw in [
            json!("happy"),
            json!(42),
            json!({"happy": "very"}),
            json!([{"label": "happy"}]),
        ] {
            let err = EmotionNormalizer::normalize_value(&raw).unwrap_err();
            assert!(matches!(err, AssessError::MalformedProviderResponse(_)), "{raw}");
        }

        let err = EmotionNormalizer::normalize(&map(&[("sad", -1.0)])).unwrap_err();
        assert!(matches!(err, AssessError::MalformedProviderResponse(_)));

        let err = EmotionNormalizer::normalize(&map(&[("sad", f64::NAN)])).unwrap_err();
        assert!(matches!(err, AssessError::MalformedProviderResponse(_)));
    }
}
