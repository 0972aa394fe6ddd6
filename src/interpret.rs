//! Questionnaire interpretation
//!
//! Turns three classified subscale scores into a full [`DassAssessment`]:
//! overall score, percentages of the 42-point maximum, a summary sentence and
//! recommendations.

use crate::scoring::MAX_SUBSCALE_RAW;
use crate::severity::SeverityClassifier;
use crate::types::{CategoryPercentages, DassAssessment, DassScores, OverallScore};

/// Maximum raw score of one subscale on the 42-item scale
pub const SUBSCALE_MAX: f64 = MAX_SUBSCALE_RAW as f64;

const INTERPRETATIONS: [(u32, &str); 4] = [
    (
        9,
        "Your mental health appears to be within normal range. Continue maintaining healthy habits.",
    ),
    (
        13,
        "You may be experiencing mild symptoms. Consider stress management techniques.",
    ),
    (
        20,
        "You may be experiencing moderate symptoms. Professional support is recommended.",
    ),
    (
        27,
        "You may be experiencing severe symptoms. Please seek professional help.",
    ),
];

const EXTREME_INTERPRETATION: &str = "You may be experiencing extremely severe symptoms. \
     Immediate professional support is strongly recommended.";

// Subscale scores strictly above these trigger targeted advice
const DEPRESSION_ADVICE_ABOVE: u32 = 13;
const ANXIETY_ADVICE_ABOVE: u32 = 9;
const STRESS_ADVICE_ABOVE: u32 = 18;

const DEPRESSION_ADVICE: [&str; 2] = [
    "Consider speaking with a mental health professional about depression symptoms",
    "Engage in regular physical activity and maintain social connections",
];
const ANXIETY_ADVICE: [&str; 2] = [
    "Practice relaxation techniques such as deep breathing or meditation",
    "Limit caffeine intake and maintain regular sleep schedule",
];
const STRESS_ADVICE: [&str; 2] = [
    "Identify and address major sources of stress in your life",
    "Practice time management and set realistic goals",
];
const MAINTENANCE_ADVICE: [&str; 2] = [
    "Maintain your current healthy lifestyle and coping strategies",
    "Continue regular self-care and stress management practices",
];

/// Builds assessments from classified scores
pub struct Interpreter;

impl Interpreter {
    pub fn assess(scores: DassScores, voice_adjusted: bool) -> DassAssessment {
        let (d, a, s) = (
            scores.depression.raw,
            scores.anxiety.raw,
            scores.stress.raw,
        );
        let mean = (u64::from(d) + u64::from(a) + u64::from(s)) as f64 / 3.0;

        DassAssessment {
            scores,
            overall: OverallScore {
                score: round1(mean),
                severity: SeverityClassifier::classify_overall(mean),
            },
            percentages: CategoryPercentages {
                depression: percentage(f64::from(d)),
                anxiety: percentage(f64::from(a)),
                stress: percentage(f64::from(s)),
                overall: percentage(mean),
            },
            interpretation: Self::interpretation(&scores).to_string(),
            recommendations: Self::recommendations(&scores),
            voice_adjusted,
        }
    }

    /// Summary sentence keyed on the highest subscale score
    pub fn interpretation(scores: &DassScores) -> &'static str {
        let highest = scores
            .depression
            .raw
            .max(scores.anxiety.raw)
            .max(scores.stress.raw);

        INTERPRETATIONS
            .iter()
            .find(|(bound, _)| highest <= *bound)
            .map(|(_, text)| *text)
            .unwrap_or(EXTREME_INTERPRETATION)
    }

    pub fn recommendations(scores: &DassScores) -> Vec<String> {
        let mut advice: Vec<&str> = Vec::new();
        if scores.depression.raw > DEPRESSION_ADVICE_ABOVE {
            advice.extend(DEPRESSION_ADVICE);
        }
        if scores.anxiety.raw > ANXIETY_ADVICE_ABOVE {
            advice.extend(ANXIETY_ADVICE);
        }
        if scores.stress.raw > STRESS_ADVICE_ABOVE {
            advice.extend(STRESS_ADVICE);
        }
        if advice.is_empty() {
            advice.extend(MAINTENANCE_ADVICE);
        }
        advice.into_iter().map(String::from).collect()
    }
}

fn percentage(score: f64) -> f64 {
    round1(score / SUBSCALE_MAX * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::CategorySums;
    use crate::types::SeverityLabel;
    use pretty_assertions::assert_eq;

    fn scores(depression: u32, anxiety: u32, stress: u32) -> DassScores {
        CategorySums {
            depression,
            anxiety,
            stress,
        }
        .classify()
    }

    #[test]
    fn test_overall_and_percentages() {
        let assessment = Interpreter::assess(scores(10, 8, 16), false);

        assert_eq!(assessment.overall.score, 11.3);
        assert_eq!(assessment.overall.severity, SeverityLabel::Mild);
        assert_eq!(assessment.percentages.depression, 23.8);
        assert_eq!(assessment.percentages.anxiety, 19.0);
        assert_eq!(assessment.percentages.stress, 38.1);
        assert_eq!(assessment.percentages.overall, 27.0);
        assert!(!assessment.voice_adjusted);
    }

    #[test]
    fn test_all_zero_is_normal_with_maintenance_advice() {
        let assessment = Interpreter::assess(scores(0, 0, 0), false);

        assert_eq!(assessment.overall.severity, SeverityLabel::Normal);
        assert!(assessment.interpretation.contains("normal range"));
        assert_eq!(assessment.recommendations, MAINTENANCE_ADVICE.to_vec());
    }

    #[test]
    fn test_interpretation_uses_highest_subscale() {
        assert!(Interpreter::interpretation(&scores(2, 2, 20)).contains("moderate"));
        assert!(Interpreter::interpretation(&scores(2, 27, 2)).contains("severe"));
        assert!(Interpreter::interpretation(&scores(42, 0, 0)).contains("extremely severe"));
    }

    #[test]
    fn test_recommendation_thresholds_are_exclusive() {
        assert_eq!(
            Interpreter::recommendations(&scores(13, 9, 18)),
            MAINTENANCE_ADVICE.to_vec()
        );

        let advice = Interpreter::recommendations(&scores(14, 10, 19));
        assert_eq!(advice.len(), 6);
        assert_eq!(advice[0], DEPRESSION_ADVICE[0]);
        assert_eq!(advice[2], ANXIETY_ADVICE[0]);
        assert_eq!(advice[4], STRESS_ADVICE[0]);
    }

    #[test]
    fn test_overall_of_extreme_sums_does_not_overflow() {
        let assessment = Interpreter::assess(scores(u32::MAX, u32::MAX, u32::MAX), false);
        assert_eq!(assessment.overall.score, f64::from(u32::MAX));
        assert_eq!(assessment.overall.severity, SeverityLabel::ExtremelySevere);
    }

    #[test]
    fn test_max_scores() {
        let assessment = Interpreter::assess(scores(42, 42, 42), true);
        assert_eq!(assessment.overall.severity, SeverityLabel::ExtremelySevere);
        assert_eq!(assessment.percentages.overall, 100.0);
        assert!(assessment.voice_adjusted);
    }
}
