//! Weighted multi-component fusion
//!
//! Combines depression/anxiety/stress indicators from up to four components
//! (voice tone, text sentiment, keyword density, facial emotion) into one
//! assessment. Each component is first converted onto its own 0-100 indicator
//! scale, then the components present are averaged with fixed weights:
//!
//! ```text
//! final = Σ(score_c * weight_c) / Σ(weight_c)   over present components c
//! ```
//!
//! A missing component lowers completeness and quality, never the scores.

use crate::error::AssessError;
use crate::normalizer::EmotionNormalizer;
use crate::severity::SeverityClassifier;
use crate::types::{DassCategory, EmotionCategory, EmotionDistribution, SeverityLabel};
use serde::{Deserialize, Deserializer, Serialize};

/// Indicator scale ceiling for converted components
const INDICATOR_MAX: f64 = 100.0;

/// Assessment component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Voice,
    Sentiment,
    Keyword,
    Facial,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::Voice,
        Component::Sentiment,
        Component::Keyword,
        Component::Facial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Voice => "voice",
            Component::Sentiment => "sentiment",
            Component::Keyword => "keyword",
            Component::Facial => "facial",
        }
    }
}

/// Relative component weights. Only the ratios matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub voice: f64,
    pub sentiment: f64,
    pub keyword: f64,
    pub facial: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            voice: 0.40,
            sentiment: 0.25,
            keyword: 0.20,
            facial: 0.15,
        }
    }
}

impl ComponentWeights {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Voice => self.voice,
            Component::Sentiment => self.sentiment,
            Component::Keyword => self.keyword,
            Component::Facial => self.facial,
        }
    }

    pub fn validate(&self) -> Result<(), AssessError> {
        if let Some(component) = Component::ALL
            .into_iter()
            .find(|c| !self.get(*c).is_finite() || self.get(*c) < 0.0)
        {
            return Err(AssessError::Config(format!(
                "fusion weight for {} must be a non-negative number",
                component.as_str()
            )));
        }
        if Component::ALL.iter().all(|c| self.get(*c) == 0.0) {
            return Err(AssessError::Config(
                "at least one fusion weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-subscale indicator values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionScores {
    #[serde(default)]
    pub depression: f64,
    #[serde(default)]
    pub anxiety: f64,
    #[serde(default)]
    pub stress: f64,
}

impl ConditionScores {
    pub fn get(&self, category: DassCategory) -> f64 {
        match category {
            DassCategory::Depression => self.depression,
            DassCategory::Anxiety => self.anxiety,
            DassCategory::Stress => self.stress,
        }
    }
}

/// Sentiment class shares of a transcript (0-1 each)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentShares {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// Mental-health keyword hits in a transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordCounts {
    pub total_words: u32,
    pub depression_indicators: u32,
    pub anxiety_indicators: u32,
    pub stress_indicators: u32,
}

/// Everything gathered for one assessment. Absent components are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComponentInputs {
    pub voice: Option<ConditionScores>,
    pub sentiment: Option<SentimentShares>,
    pub keywords: Option<KeywordCounts>,
    /// Facial emotions; any provider label mapping is accepted and normalized
    #[serde(deserialize_with = "deserialize_facial")]
    pub facial: Option<EmotionDistribution>,
}

fn deserialize_facial<'de, D>(deserializer: D) -> Result<Option<EmotionDistribution>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    raw.map(|value| EmotionNormalizer::normalize_value(&value))
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// Fused score of one subscale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusedScore {
    pub score: f64,
    pub severity: SeverityLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusedScores {
    pub depression: FusedScore,
    pub anxiety: FusedScore,
    pub stress: FusedScore,
}

impl FusedScores {
    pub fn get(&self, category: DassCategory) -> FusedScore {
        match category {
            DassCategory::Depression => self.depression,
            DassCategory::Anxiety => self.anxiety,
            DassCategory::Stress => self.stress,
        }
    }
}

/// Converted indicators of one present component
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentScore {
    pub component: Component,
    pub weight: f64,
    pub scores: ConditionScores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Minimal,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Tier from the highest and the mean fused score
    pub fn from_scores(max_score: f64, average_score: f64) -> Self {
        if max_score >= 50.0 || average_score >= 35.0 {
            RiskLevel::High
        } else if max_score >= 25.0 || average_score >= 20.0 {
            RiskLevel::Moderate
        } else if max_score >= 15.0 || average_score >= 10.0 {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub overall_risk: RiskLevel,
    pub max_score: f64,
    pub average_score: f64,
    /// Subscale with the highest fused score; ties go to the earlier subscale
    pub primary_concern: DassCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Insufficient,
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssessmentQuality {
    /// Present components / all components
    pub completeness: f64,
    pub quality: QualityTier,
    pub available_components: usize,
    pub total_components: usize,
}

impl AssessmentQuality {
    pub fn from_counts(available_components: usize, total_components: usize) -> Self {
        let completeness = if total_components == 0 {
            0.0
        } else {
            available_components as f64 / total_components as f64
        };

        let quality = if completeness >= 0.75 {
            QualityTier::High
        } else if completeness >= 0.5 {
            QualityTier::Moderate
        } else if completeness >= 0.25 {
            QualityTier::Low
        } else {
            QualityTier::Insufficient
        };

        Self {
            completeness,
            quality,
            available_components,
            total_components,
        }
    }
}

/// Result of a weighted fusion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedAssessment {
    pub final_scores: FusedScores,
    pub components: Vec<ComponentScore>,
    pub weights: ComponentWeights,
    pub risk: RiskAssessment,
    pub quality: AssessmentQuality,
}

/// Weighted fusion over assessment components
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedFusion {
    weights: ComponentWeights,
}

impl WeightedFusion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ComponentWeights) -> Result<Self, AssessError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ComponentWeights {
        &self.weights
    }

    /// Fuse whatever components are present
    pub fn fuse(&self, inputs: &ComponentInputs) -> Result<FusedAssessment, AssessError> {
        let components = self.component_scores(inputs)?;
        let weight_sum: f64 = components.iter().map(|c| c.weight).sum();

        let fused = |category: DassCategory| {
            let score = if weight_sum > 0.0 {
                components
                    .iter()
                    .map(|c| c.scores.get(category) * c.weight)
                    .sum::<f64>()
                    / weight_sum
            } else {
                0.0
            };
            FusedScore {
                score,
                severity: SeverityClassifier::classify_value(score, category),
            }
        };

        let final_scores = FusedScores {
            depression: fused(DassCategory::Depression),
            anxiety: fused(DassCategory::Anxiety),
            stress: fused(DassCategory::Stress),
        };
        let risk = Self::assess_risk(&final_scores);
        let quality = AssessmentQuality::from_counts(components.len(), Component::ALL.len());

        tracing::debug!(
            components = components.len(),
            risk = ?risk.overall_risk,
            primary = risk.primary_concern.as_str(),
            "Weighted fusion complete"
        );

        Ok(FusedAssessment {
            final_scores,
            components,
            weights: self.weights,
            risk,
            quality,
        })
    }

    fn component_scores(
        &self,
        inputs: &ComponentInputs,
    ) -> Result<Vec<ComponentScore>, AssessError> {
        let mut components = Vec::with_capacity(Component::ALL.len());
        let mut push = |component: Component, scores: ConditionScores| {
            components.push(ComponentScore {
                component,
                weight: self.weights.get(component),
                scores,
            });
        };

        if let Some(voice) = inputs.voice {
            check_non_negative("voice", &[voice.depression, voice.anxiety, voice.stress])?;
            push(Component::Voice, voice);
        }
        if let Some(sentiment) = inputs.sentiment {
            check_non_negative(
                "sentiment",
                &[sentiment.positive, sentiment.negative, sentiment.neutral],
            )?;
            push(Component::Sentiment, Self::sentiment_indicators(&sentiment));
        }
        if let Some(keywords) = inputs.keywords {
            push(Component::Keyword, Self::keyword_indicators(&keywords));
        }
        if let Some(facial) = &inputs.facial {
            push(Component::Facial, Self::facial_indicators(facial));
        }

        Ok(components)
    }

    /// Negative sentiment raises every subscale, positive sentiment offsets it
    pub fn sentiment_indicators(sentiment: &SentimentShares) -> ConditionScores {
        let base = sentiment.negative * 50.0;
        let protective = sentiment.positive * 10.0;

        ConditionScores {
            depression: (base - protective).max(0.0),
            anxiety: (base * 0.8 - protective).max(0.0),
            stress: (base * 0.9 - protective).max(0.0),
        }
    }

    /// Keyword density scaled ×200 and capped at 100
    pub fn keyword_indicators(keywords: &KeywordCounts) -> ConditionScores {
        let total = f64::from(keywords.total_words.max(1));
        let density = |hits: u32| (f64::from(hits) / total * 200.0).min(INDICATOR_MAX);

        ConditionScores {
            depression: density(keywords.depression_indicators),
            anxiety: density(keywords.anxiety_indicators),
            stress: density(keywords.stress_indicators),
        }
    }

    pub fn facial_indicators(facial: &EmotionDistribution) -> ConditionScores {
        let sad = facial.get(EmotionCategory::Sad);
        let fear = facial.get(EmotionCategory::Fear);
        let angry = facial.get(EmotionCategory::Angry);
        let happy = facial.get(EmotionCategory::Happy);

        ConditionScores {
            depression: (sad * 80.0 + (1.0 - happy) * 20.0).min(INDICATOR_MAX),
            anxiety: (fear * 70.0 + sad * 30.0).min(INDICATOR_MAX),
            stress: (angry * 60.0 + fear * 40.0).min(INDICATOR_MAX),
        }
    }

    pub fn assess_risk(scores: &FusedScores) -> RiskAssessment {
        let primary_concern = DassCategory::ALL
            .into_iter()
            .fold(DassCategory::Depression, |best, category| {
                if scores.get(category).score > scores.get(best).score {
                    category
                } else {
                    best
                }
            });

        let values = DassCategory::ALL.map(|category| scores.get(category).score);
        let max_score = values.iter().copied().fold(0.0_f64, f64::max);
        let average_score = values.iter().sum::<f64>() / values.len() as f64;

        RiskAssessment {
            overall_risk: RiskLevel::from_scores(max_score, average_score),
            max_score,
            average_score,
            primary_concern,
        }
    }
}

fn check_non_negative(component: &str, values: &[f64]) -> Result<(), AssessError> {
    if values.iter().all(|v| v.is_finite() && *v >= 0.0) {
        Ok(())
    } else {
        Err(AssessError::InvalidInput(format!(
            "{component} scores must be non-negative numbers"
        )))
    }
}
