//! Multi-frame facial stress
//!
//! Summarizes a sequence of per-frame facial readings (one dominant emotion
//! and a confidence per frame) into a confidence-weighted 0-100 stress score.
//! Frames dominated by anger, fear or sadness weigh 3, disgust or surprise 2,
//! anything else 1; the score is the weighted sum over the maximum reachable
//! sum `3 * frames`.

use crate::severity::SeverityClassifier;
use crate::types::{EmotionCategory, EmotionDistribution, StressLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_FRAME_WEIGHT: f64 = 3.0;

/// One analyzed frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameReading {
    pub dominant: EmotionCategory,
    /// Classifier confidence for the dominant emotion (0-1)
    pub confidence: f64,
}

impl FrameReading {
    /// Reading from a full distribution, using the dominant share as confidence
    pub fn from_distribution(distribution: &EmotionDistribution) -> Self {
        let (dominant, share) = distribution.dominant();
        Self {
            dominant,
            confidence: share,
        }
    }
}

/// Summary over all frames of a capture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameStressSummary {
    pub level: StressLevel,
    /// Weighted stress score (0-100, two decimals)
    pub score: f64,
    /// Mean frame confidence (two decimals)
    pub confidence: f64,
    /// Frames per dominant emotion; every category is listed
    pub emotion_counts: BTreeMap<EmotionCategory, usize>,
    pub frames_analyzed: usize,
}

pub struct FrameStress;

impl FrameStress {
    pub fn frame_weight(category: EmotionCategory) -> f64 {
        match category {
            EmotionCategory::Angry | EmotionCategory::Fear | EmotionCategory::Sad => 3.0,
            EmotionCategory::Disgust | EmotionCategory::Surprise => 2.0,
            EmotionCategory::Happy | EmotionCategory::Neutral => 1.0,
        }
    }

    /// Summarize frames. `None` when there are no frames to judge.
    pub fn summarize(frames: &[FrameReading]) -> Option<FrameStressSummary> {
        if frames.is_empty() {
            return None;
        }

        let mut emotion_counts: BTreeMap<EmotionCategory, usize> =
            EmotionCategory::ALL.into_iter().map(|c| (c, 0)).collect();
        let mut weighted = 0.0;
        let mut confidence_sum = 0.0;

        for frame in frames {
            let confidence = if frame.confidence.is_finite() {
                frame.confidence.clamp(0.0, 1.0)
            } else {
                0.0
            };

            *emotion_counts.entry(frame.dominant).or_insert(0) += 1;
            weighted += Self::frame_weight(frame.dominant) * confidence;
            confidence_sum += confidence;
        }

        let count = frames.len() as f64;
        let score = weighted / (MAX_FRAME_WEIGHT * count) * 100.0;

        tracing::debug!(
            frames = frames.len(),
            score,
            "Multi-frame stress computed"
        );

        Some(FrameStressSummary {
            level: SeverityClassifier::classify_frame_score(score),
            score: round2(score),
            confidence: round2(confidence_sum / count),
            emotion_counts,
            frames_analyzed: frames.len(),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
