//! Severity classification
//!
//! Two threshold families live here and must not be mixed:
//! - DASS subscale tables (depression, anxiety, stress) on the 42-point scale
//! - The three-tier tables for the emotion-derived 0-100 stress score and
//!   the multi-frame facial stress score

use crate::types::{DassCategory, SeverityLabel, StressLevel};

/// Inclusive upper bounds for Normal, Mild, Moderate and Severe.
/// Anything above the last bound is ExtremelySevere.
pub type ThresholdTable = [u32; 4];

pub const DEPRESSION_THRESHOLDS: ThresholdTable = [9, 13, 20, 27];
pub const ANXIETY_THRESHOLDS: ThresholdTable = [7, 9, 14, 19];
pub const STRESS_THRESHOLDS: ThresholdTable = [14, 18, 25, 33];

/// Inclusive upper bounds for the overall (mean of subscales) score
pub const OVERALL_THRESHOLDS: [f64; 4] = [10.0, 13.0, 20.0, 27.0];

/// Inclusive upper bounds for Low and Moderate on the 0-100 emotion scale
pub const EMOTION_STRESS_THRESHOLDS: [u8; 2] = [30, 60];

/// Inclusive lower bounds for Moderate and High on the multi-frame scale
pub const FRAME_STRESS_THRESHOLDS: [f64; 2] = [40.0, 70.0];

const LABELS: [SeverityLabel; 4] = [
    SeverityLabel::Normal,
    SeverityLabel::Mild,
    SeverityLabel::Moderate,
    SeverityLabel::Severe,
];

/// Classifier for DASS and emotion-derived scores
pub struct SeverityClassifier;

impl SeverityClassifier {
    /// Threshold table for a DASS subscale
    pub fn thresholds(category: DassCategory) -> ThresholdTable {
        match category {
            DassCategory::Depression => DEPRESSION_THRESHOLDS,
            DassCategory::Anxiety => ANXIETY_THRESHOLDS,
            DassCategory::Stress => STRESS_THRESHOLDS,
        }
    }

    /// Classify a raw DASS subscale score
    pub fn classify(raw: u32, category: DassCategory) -> SeverityLabel {
        Self::thresholds(category)
            .iter()
            .zip(LABELS)
            .find(|(bound, _)| raw <= **bound)
            .map(|(_, label)| label)
            .unwrap_or(SeverityLabel::ExtremelySevere)
    }

    /// Classify a fractional subscale score against the same table
    pub fn classify_value(score: f64, category: DassCategory) -> SeverityLabel {
        Self::thresholds(category)
            .iter()
            .zip(LABELS)
            .find(|(bound, _)| score <= f64::from(**bound))
            .map(|(_, label)| label)
            .unwrap_or(SeverityLabel::ExtremelySevere)
    }

    /// Classify the mean of the three subscale scores
    pub fn classify_overall(score: f64) -> SeverityLabel {
        OVERALL_THRESHOLDS
            .iter()
            .zip(LABELS)
            .find(|(bound, _)| score <= **bound)
            .map(|(_, label)| label)
            .unwrap_or(SeverityLabel::ExtremelySevere)
    }

    /// Classify the emotion-derived 0-100 stress score
    pub fn classify_stress_score(score: u8) -> StressLevel {
        let [low, moderate] = EMOTION_STRESS_THRESHOLDS;
        if score <= low {
            StressLevel::Low
        } else if score <= moderate {
            StressLevel::Moderate
        } else {
            StressLevel::High
        }
    }

    /// Classify the confidence-weighted multi-frame stress score
    pub fn classify_frame_score(score: f64) -> StressLevel {
        let [moderate, high] = FRAME_STRESS_THRESHOLDS;
        if score >= high {
            StressLevel::High
        } else if score >= moderate {
            StressLevel::Moderate
        } else {
            StressLevel::Low
        }
    }
}
