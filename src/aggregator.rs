//! Multi-modal aggregation
//!
//! Combines questionnaire scores with per-question voice readings. Each
//! subscale is handled on its own: a subscale with voice readings is replaced
//! by the calibrated voice mean, a subscale without readings keeps its
//! questionnaire score and severity. Adjusted scores stay on the 42-point
//! subscale scale.

use crate::scoring::MAX_SUBSCALE_RAW;
use crate::severity::SeverityClassifier;
use crate::types::{DassCategory, DassCategoryScore, DassScores, VoiceReading};

/// Points subtracted from the voice mean before re-classification
pub const CALIBRATION_OFFSET: f64 = 5.0;

/// Aggregator for questionnaire and voice-derived scores
pub struct MultiModalAggregator;

impl MultiModalAggregator {
    /// Merge voice readings into questionnaire scores.
    ///
    /// With no usable readings the questionnaire scores are returned as-is.
    pub fn aggregate(questionnaire: &DassScores, voice: &[VoiceReading]) -> DassScores {
        let mut combined = *questionnaire;

        for category in DassCategory::ALL {
            let Some(mean) = Self::voice_mean(voice, category) else {
                continue;
            };

            let raw = (mean - CALIBRATION_OFFSET)
                .round()
                .clamp(0.0, f64::from(MAX_SUBSCALE_RAW)) as u32;
            let severity = SeverityClassifier::classify(raw, category);

            tracing::debug!(
                category = category.as_str(),
                questionnaire = questionnaire.get(category).raw,
                voice_mean = mean,
                adjusted = raw,
                "Voice readings replaced questionnaire score"
            );

            combined.set(category, DassCategoryScore { raw, severity });
        }

        combined
    }

    /// Mean of the finite readings for one subscale, if any
    pub fn voice_mean(voice: &[VoiceReading], category: DassCategory) -> Option<f64> {
        let values: Vec<f64> = voice
            .iter()
            .filter_map(|reading| reading.get(category))
            .filter(|value| value.is_finite())
            .collect();

        if values.is_empty() {
            return None;
        }

        // Divide before summing so readings near f64::MAX stay finite
        let count = values.len() as f64;
        Some(values.iter().map(|value| value / count).sum())
    }

    /// Whether any subscale would be adjusted by these readings
    pub fn has_voice_signal(voice: &[VoiceReading]) -> bool {
        DassCategory::ALL
            .iter()
            .any(|category| Self::voice_mean(voice, *category).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::CategorySums;
    use crate::types::SeverityLabel;
    use pretty_assertions::assert_eq;

    fn questionnaire() -> DassScores {
        CategorySums {
            depression: 4,
            anxiety: 12,
            stress: 16,
        }
        .classify()
    }

    fn depression(value: f64) -> VoiceReading {
        VoiceReading {
            depression: Some(value),
            ..VoiceReading::default()
        }
    }

    #[test]
    fn test_empty_voice_is_identity() {
        let scores = questionnaire();
        assert_eq!(MultiModalAggregator::aggregate(&scores, &[]), scores);
        assert!(!MultiModalAggregator::has_voice_signal(&[]));
    }

    #[test]
    fn test_depression_readings_are_averaged_and_offset() {
        let scores = questionnaire();
        let combined =
            MultiModalAggregator::aggregate(&scores, &[depression(20.0), depression(30.0)]);

        assert_eq!(combined.depression.raw, 20);
        assert_eq!(combined.depression.severity, SeverityLabel::Moderate);
    }

    #[test]
    fn test_partial_readings_keep_other_subscales() {
        let scores = questionnaire();
        let combined =
            MultiModalAggregator::aggregate(&scores, &[depression(20.0), depression(30.0)]);

        assert_eq!(combined.anxiety, scores.anxiety);
        assert_eq!(combined.stress, scores.stress);
    }

    #[test]
    fn test_voice_overrides_questionnaire_severity() {
        // Questionnaire anxiety 12 is Moderate; voice mean 8 adjusts to 3 (Normal)
        let scores = questionnaire();
        assert_eq!(scores.anxiety.severity, SeverityLabel::Moderate);

        let reading = VoiceReading {
            anxiety: Some(8.0),
            ..VoiceReading::default()
        };
        let combined = MultiModalAggregator::aggregate(&scores, &[reading]);
        assert_eq!(combined.anxiety.raw, 3);
        assert_eq!(combined.anxiety.severity, SeverityLabel::Normal);
    }

    #[test]
    fn test_adjusted_score_never_negative() {
        let reading = VoiceReading {
            stress: Some(2.0),
            ..VoiceReading::default()
        };
        let combined = MultiModalAggregator::aggregate(&questionnaire(), &[reading]);
        assert_eq!(combined.stress.raw, 0);
        assert_eq!(combined.stress.severity, SeverityLabel::Normal);
    }

    #[test]
    fn test_adjusted_score_capped_at_subscale_max() {
        let reading = VoiceReading {
            stress: Some(500.0),
            ..VoiceReading::default()
        };
        let combined = MultiModalAggregator::aggregate(&questionnaire(), &[reading]);
        assert_eq!(combined.stress.raw, 42);
        assert_eq!(combined.stress.severity, SeverityLabel::ExtremelySevere);
    }

    #[test]
    fn test_huge_readings_stay_finite() {
        let huge = VoiceReading {
            depression: Some(f64::MAX),
            anxiety: Some(1e12),
            stress: Some(f64::MAX),
        };
        let mean = MultiModalAggregator::voice_mean(&[huge, huge], DassCategory::Depression);
        assert!(mean.is_some_and(f64::is_finite));

        let combined = MultiModalAggregator::aggregate(&questionnaire(), &[huge, huge]);
        for category in DassCategory::ALL {
            assert_eq!(combined.get(category).raw, 42);
        }
    }

    #[test]
    fn test_non_finite_readings_are_ignored() {
        let voice = [depression(f64::NAN), depression(25.0)];
        assert_eq!(
            MultiModalAggregator::voice_mean(&voice, DassCategory::Depression),
            Some(25.0)
        );
        assert_eq!(
            MultiModalAggregator::voice_mean(&[depression(f64::NAN)], DassCategory::Depression),
            None
        );
    }
}
