//! Core types for the Synheart Affect engine
//!
//! This module defines the value objects that flow through each stage of an
//! assessment: emotion distributions, source tags, DASS category scores and
//! the final stress report. Everything here is created per request and never
//! shared.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical emotion category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Happy,
    Sad,
    Angry,
    Fear,
    Surprise,
    Disgust,
    Neutral,
}

impl EmotionCategory {
    /// All seven categories in canonical order
    pub const ALL: [EmotionCategory; 7] = [
        EmotionCategory::Happy,
        EmotionCategory::Sad,
        EmotionCategory::Angry,
        EmotionCategory::Fear,
        EmotionCategory::Surprise,
        EmotionCategory::Disgust,
        EmotionCategory::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionCategory::Happy => "happy",
            EmotionCategory::Sad => "sad",
            EmotionCategory::Angry => "angry",
            EmotionCategory::Fear => "fear",
            EmotionCategory::Surprise => "surprise",
            EmotionCategory::Disgust => "disgust",
            EmotionCategory::Neutral => "neutral",
        }
    }

    /// Look up a canonical (already folded, lower-case) label
    pub fn from_canonical(label: &str) -> Option<Self> {
        EmotionCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            EmotionCategory::Happy => 0,
            EmotionCategory::Sad => 1,
            EmotionCategory::Angry => 2,
            EmotionCategory::Fear => 3,
            EmotionCategory::Surprise => 4,
            EmotionCategory::Disgust => 5,
            EmotionCategory::Neutral => 6,
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seven-category emotion distribution summing to 1.0
///
/// Only the normalizer and the local fallback construct distributions, so
/// every instance satisfies the sum-to-one invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionDistribution {
    values: [f64; 7],
}

impl EmotionDistribution {
    /// Build from already normalized values in canonical order
    pub(crate) fn from_normalized(values: [f64; 7]) -> Self {
        Self { values }
    }

    /// Share of a single category (0-1)
    pub fn get(&self, category: EmotionCategory) -> f64 {
        self.values[category.index()]
    }

    /// Iterate categories with their shares in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (EmotionCategory, f64)> + '_ {
        EmotionCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Sum of all shares (1.0 within floating-point tolerance)
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Category with the largest share. Ties resolve to the earlier
    /// category in canonical order.
    pub fn dominant(&self) -> (EmotionCategory, f64) {
        self.iter()
            .fold((EmotionCategory::Neutral, f64::MIN), |best, (category, share)| {
                if share > best.1 {
                    (category, share)
                } else {
                    best
                }
            })
    }
}

impl Serialize for EmotionDistribution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(7))?;
        for (category, share) in self.iter() {
            map.serialize_entry(category.as_str(), &share)?;
        }
        map.end()
    }
}

/// Which source produced a scoring result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Hosted inference endpoint
    RemotePrimary,
    /// Self-hosted analysis service
    RemoteSecondary,
    /// Locally synthesized placeholder signal
    LocalFallback,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::RemotePrimary => "remote_primary",
            SourceKind::RemoteSecondary => "remote_secondary",
            SourceKind::LocalFallback => "local_fallback",
        }
    }

    /// Whether results from this source are real measurements
    pub fn is_authoritative(&self) -> bool {
        !matches!(self, SourceKind::LocalFallback)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved scoring result tagged with the source that produced it
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSource {
    pub kind: SourceKind,
    pub distribution: EmotionDistribution,
    /// Confidence reported by the provider, when it reports one
    pub provider_confidence: Option<f64>,
}

/// Ordinal DASS severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLabel {
    Normal,
    Mild,
    Moderate,
    Severe,
    ExtremelySevere,
}

impl SeverityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLabel::Normal => "normal",
            SeverityLabel::Mild => "mild",
            SeverityLabel::Moderate => "moderate",
            SeverityLabel::Severe => "severe",
            SeverityLabel::ExtremelySevere => "extremely_severe",
        }
    }
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier of the emotion-derived 0-100 stress score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl StressLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
        }
    }
}

/// DASS subscale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DassCategory {
    Depression,
    Anxiety,
    Stress,
}

impl DassCategory {
    pub const ALL: [DassCategory; 3] = [
        DassCategory::Depression,
        DassCategory::Anxiety,
        DassCategory::Stress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DassCategory::Depression => "depression",
            DassCategory::Anxiety => "anxiety",
            DassCategory::Stress => "stress",
        }
    }
}

impl fmt::Display for DassCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score for a single DASS subscale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DassCategoryScore {
    /// Raw score on the 42-point DASS scale
    pub raw: u32,
    /// Severity consistent with the category's threshold table
    pub severity: SeverityLabel,
}

/// Scores for all three DASS subscales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DassScores {
    pub depression: DassCategoryScore,
    pub anxiety: DassCategoryScore,
    pub stress: DassCategoryScore,
}

impl DassScores {
    pub fn get(&self, category: DassCategory) -> DassCategoryScore {
        match category {
            DassCategory::Depression => self.depression,
            DassCategory::Anxiety => self.anxiety,
            DassCategory::Stress => self.stress,
        }
    }

    pub(crate) fn set(&mut self, category: DassCategory, score: DassCategoryScore) {
        match category {
            DassCategory::Depression => self.depression = score,
            DassCategory::Anxiety => self.anxiety = score,
            DassCategory::Stress => self.stress = score,
        }
    }
}

/// One voice-derived reading for a single question.
///
/// Readings may cover only some subscales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceReading {
    #[serde(default)]
    pub depression: Option<f64>,
    #[serde(default)]
    pub anxiety: Option<f64>,
    #[serde(default)]
    pub stress: Option<f64>,
}

impl VoiceReading {
    pub fn get(&self, category: DassCategory) -> Option<f64> {
        match category {
            DassCategory::Depression => self.depression,
            DassCategory::Anxiety => self.anxiety,
            DassCategory::Stress => self.stress,
        }
    }
}

/// Emotion-path stress report
#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    /// Stress score (0-100)
    pub score: u8,
    pub level: StressLevel,
    pub dominant_category: EmotionCategory,
    /// Confidence in the dominant category (0-1)
    pub confidence: f64,
    pub source: SourceKind,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    pub distribution: EmotionDistribution,
}

/// Overall DASS score across the three subscales
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallScore {
    /// Mean of the three raw scores, one decimal
    pub score: f64,
    pub severity: SeverityLabel,
}

/// Share of the 42-point maximum (0-100, one decimal)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryPercentages {
    pub depression: f64,
    pub anxiety: f64,
    pub stress: f64,
    pub overall: f64,
}

/// Complete questionnaire (optionally voice-adjusted) assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DassAssessment {
    pub scores: DassScores,
    pub overall: OverallScore,
    pub percentages: CategoryPercentages,
    pub interpretation: String,
    pub recommendations: Vec<String>,
    /// Whether voice readings adjusted at least one subscale
    pub voice_adjusted: bool,
}
