//! Stress scoring
//!
//! Two independent paths:
//! - Emotion path: weighted sum over a normalized distribution → 0-100
//! - Questionnaire path: DASS item sums per subscale on the native scale

use crate::error::AssessError;
use crate::severity::SeverityClassifier;
use crate::types::{
    DassCategory, DassCategoryScore, DassScores, EmotionCategory, EmotionDistribution,
};
use serde::{Deserialize, Serialize};

/// Highest valid response to a single questionnaire item
pub const MAX_ITEM_RESPONSE: u8 = 3;

/// Number of items in the DASS-21 short form
pub const DASS21_ITEM_COUNT: usize = 21;

/// Projection factor from the 21-item form onto the 42-item scale
pub const DASS21_SCALE_FACTOR: u32 = 2;

/// Largest accepted projection factor
pub const MAX_SCALE_FACTOR: u32 = DASS21_SCALE_FACTOR;

/// Highest raw score of one subscale on the 42-item scale
pub const MAX_SUBSCALE_RAW: u32 = 42;

// Zero-based item indices of the standard DASS-21 subscales
const DASS21_DEPRESSION: [usize; 7] = [2, 4, 9, 12, 15, 16, 20];
const DASS21_ANXIETY: [usize; 7] = [1, 3, 6, 8, 14, 18, 19];
const DASS21_STRESS: [usize; 7] = [0, 5, 7, 10, 11, 13, 17];

/// Stress weight of each emotion category
pub fn emotion_weight(category: EmotionCategory) -> f64 {
    match category {
        EmotionCategory::Angry => 0.8,
        EmotionCategory::Fear => 0.7,
        EmotionCategory::Sad => 0.6,
        EmotionCategory::Disgust => 0.5,
        EmotionCategory::Surprise => 0.3,
        EmotionCategory::Neutral => 0.2,
        EmotionCategory::Happy => 0.1,
    }
}

/// Item → subscale assignment for a questionnaire form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMap {
    assignments: Vec<DassCategory>,
    scale_factor: u32,
}

impl ItemMap {
    /// Standard DASS-21 assignment, projected onto the 42-item scale
    pub fn dass21() -> Self {
        let mut assignments = vec![DassCategory::Stress; DASS21_ITEM_COUNT];
        for index in DASS21_DEPRESSION {
            assignments[index] = DassCategory::Depression;
        }
        for index in DASS21_ANXIETY {
            assignments[index] = DassCategory::Anxiety;
        }
        for index in DASS21_STRESS {
            assignments[index] = DassCategory::Stress;
        }

        Self {
            assignments,
            scale_factor: DASS21_SCALE_FACTOR,
        }
    }

    /// Round-robin depression/anxiety/stress assignment.
    ///
    /// Matches the service questionnaire form where item `i` belongs to
    /// subscale `i % 3`.
    pub fn interleaved(item_count: usize, scale_factor: u32) -> Result<Self, AssessError> {
        Self::custom(interleaved_assignments(item_count), scale_factor)
    }

    /// Caller-declared assignment. Each index belongs to exactly one
    /// subscale, so the partition is disjoint by construction.
    pub fn custom(assignments: Vec<DassCategory>, scale_factor: u32) -> Result<Self, AssessError> {
        if assignments.is_empty() {
            return Err(AssessError::InvalidInput(
                "item map must assign at least one item".to_string(),
            ));
        }
        if !(1..=MAX_SCALE_FACTOR).contains(&scale_factor) {
            return Err(AssessError::InvalidInput(format!(
                "item map scale factor must be between 1-{MAX_SCALE_FACTOR}, got {scale_factor}"
            )));
        }
        if let Some(category) = overfull_subscale(&assignments, scale_factor) {
            return Err(AssessError::InvalidInput(format!(
                "{category} items can exceed {MAX_SUBSCALE_RAW} points"
            )));
        }
        Ok(Self {
            assignments,
            scale_factor,
        })
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn scale_factor(&self) -> u32 {
        self.scale_factor
    }

    /// Subscale of an item, if the index is in range
    pub fn category_of(&self, index: usize) -> Option<DassCategory> {
        self.assignments.get(index).copied()
    }

    /// Number of items assigned to a subscale
    pub fn item_count(&self, category: DassCategory) -> usize {
        self.assignments.iter().filter(|c| **c == category).count()
    }
}

/// Round-robin depression/anxiety/stress assignment of `item_count` items
pub fn interleaved_assignments(item_count: usize) -> Vec<DassCategory> {
    (0..item_count)
        .map(|i| DassCategory::ALL[i % DassCategory::ALL.len()])
        .collect()
}

/// First subscale whose highest reachable score exceeds the 42-point scale
pub fn overfull_subscale(
    assignments: &[DassCategory],
    scale_factor: u32,
) -> Option<DassCategory> {
    DassCategory::ALL.into_iter().find(|category| {
        let items = assignments.iter().filter(|c| *c == category).count() as u64;
        let ceiling = items * u64::from(MAX_ITEM_RESPONSE) * u64::from(scale_factor);
        ceiling > u64::from(MAX_SUBSCALE_RAW)
    })
}

/// Raw per-subscale sums on the DASS native scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySums {
    pub depression: u32,
    pub anxiety: u32,
    pub stress: u32,
}

impl CategorySums {
    pub fn get(&self, category: DassCategory) -> u32 {
        match category {
            DassCategory::Depression => self.depression,
            DassCategory::Anxiety => self.anxiety,
            DassCategory::Stress => self.stress,
        }
    }

    fn set(&mut self, category: DassCategory, value: u32) {
        match category {
            DassCategory::Depression => self.depression = value,
            DassCategory::Anxiety => self.anxiety = value,
            DassCategory::Stress => self.stress = value,
        }
    }

    /// Reject sums beyond the 42-point subscale maximum
    pub fn check_range(&self) -> Result<(), AssessError> {
        match DassCategory::ALL
            .into_iter()
            .find(|category| self.get(*category) > MAX_SUBSCALE_RAW)
        {
            Some(category) => Err(AssessError::InvalidInput(format!(
                "{category} score must be between 0-{MAX_SUBSCALE_RAW}, got {}",
                self.get(category)
            ))),
            None => Ok(()),
        }
    }

    fn add(&mut self, category: DassCategory, value: u32) {
        match category {
            DassCategory::Depression => self.depression += value,
            DassCategory::Anxiety => self.anxiety += value,
            DassCategory::Stress => self.stress += value,
        }
    }

    /// Attach severities from the fixed DASS tables
    pub fn classify(&self) -> DassScores {
        let score = |category: DassCategory| {
            let raw = self.get(category);
            DassCategoryScore {
                raw,
                severity: SeverityClassifier::classify(raw, category),
            }
        };

        DassScores {
            depression: score(DassCategory::Depression),
            anxiety: score(DassCategory::Anxiety),
            stress: score(DassCategory::Stress),
        }
    }
}

/// Scorer for both assessment paths
pub struct StressScorer;

impl StressScorer {
    /// Weighted 0-100 stress score of an emotion distribution
    pub fn score_from_emotion(dist: &EmotionDistribution) -> u8 {
        let weighted: f64 = dist
            .iter()
            .map(|(category, share)| emotion_weight(category) * share)
            .sum();
        (weighted * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Per-subscale sums of questionnaire responses
    pub fn score_from_items(items: &[u8], map: &ItemMap) -> Result<CategorySums, AssessError> {
        if items.len() != map.len() {
            return Err(AssessError::InvalidInput(format!(
                "expected {} responses, got {}",
                map.len(),
                items.len()
            )));
        }

        let mut sums = CategorySums::default();
        for (index, response) in items.iter().enumerate() {
            if *response > MAX_ITEM_RESPONSE {
                return Err(AssessError::InvalidInput(format!(
                    "response {index} must be between 0-{MAX_ITEM_RESPONSE}, got {response}"
                )));
            }
            if let Some(category) = map.category_of(index) {
                sums.add(category, u32::from(*response));
            }
        }

        for category in DassCategory::ALL {
            let scaled = sums
                .get(category)
                .checked_mul(map.scale_factor)
                .filter(|raw| *raw <= MAX_SUBSCALE_RAW)
                .ok_or_else(|| {
                    AssessError::InvalidInput(format!(
                        "{category} score exceeds {MAX_SUBSCALE_RAW} points"
                    ))
                })?;
            sums.set(category, scaled);
        }

        Ok(sums)
    }
}
