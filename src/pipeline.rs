//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Affect. It wires the
//! scoring stages together for both assessment paths:
//!
//! - Emotion path: image → SourceFallbackChain → StressScorer →
//!   SeverityClassifier → StressReport
//! - Questionnaire path: responses → StressScorer → SeverityClassifier →
//!   MultiModalAggregator (when voice readings exist) → DassAssessment
//! - Fusion path: voice/sentiment/keyword/facial indicators →
//!   WeightedFusion → FusedAssessment
//! - Frame path: images → SourceFallbackChain per frame → FrameStress

use crate::aggregator::MultiModalAggregator;
use crate::chain::{ProbeResult, SourceFallbackChain};
use crate::config::AffectConfig;
use crate::error::AssessError;
use crate::frames::{FrameReading, FrameStress, FrameStressSummary};
use crate::fusion::{ComponentInputs, FusedAssessment, WeightedFusion};
use crate::interpret::Interpreter;
use crate::report::{build_stress_report, AffectReport, ReportEncoder};
use crate::schema::{AssessmentRequest, RequestAdapter};
use crate::scoring::{ItemMap, StressScorer};
use crate::sources::ImageInput;
use crate::types::{DassAssessment, SourceKind, StressReport, VoiceReading};
use chrono::Utc;
use tokio_util::sync::CancellationToken;

/// Score questionnaire responses on their own.
///
/// # Example
/// ```ignore
/// let assessment = score_questionnaire(&responses, &ItemMap::dass21())?;
/// println!("{}", assessment.overall.severity);
/// ```
pub fn score_questionnaire(
    responses: &[u8],
    map: &ItemMap,
) -> Result<DassAssessment, AssessError> {
    score_combined(responses, map, &[])
}

/// Score questionnaire responses and fold in per-question voice readings.
///
/// Subscales with voice readings take the calibrated voice score; the rest
/// keep their questionnaire score.
pub fn score_combined(
    responses: &[u8],
    map: &ItemMap,
    voice: &[VoiceReading],
) -> Result<DassAssessment, AssessError> {
    let questionnaire = StressScorer::score_from_items(responses, map)?.classify();
    let combined = MultiModalAggregator::aggregate(&questionnaire, voice);
    Ok(Interpreter::assess(
        combined,
        MultiModalAggregator::has_voice_signal(voice),
    ))
}

/// Validate and score a single request
pub fn process_request(request: &AssessmentRequest) -> Result<DassAssessment, AssessError> {
    request
        .validate()
        .map_err(|e| AssessError::InvalidInput(e.to_string()))?;

    let map = request.item_map()?;
    let responses = request.item_responses()?;
    score_combined(&responses, &map, &request.voice)
}

/// Convert a batch of requests (JSON array or NDJSON) into report envelopes.
///
/// Returns one JSON document per request, in input order. The first invalid
/// request fails the whole batch.
pub fn requests_to_reports(input: &str) -> Result<Vec<String>, AssessError> {
    let requests = RequestAdapter::parse_auto(input)?;
    let encoder = ReportEncoder::new();

    requests
        .iter()
        .map(|request| {
            let assessment = process_request(request)?;
            encoder.to_json(&encoder.encode_assessment(assessment))
        })
        .collect()
}

/// Fuse assessment components with the default weights
pub fn fuse_components(inputs: &ComponentInputs) -> Result<FusedAssessment, AssessError> {
    WeightedFusion::new().fuse(inputs)
}

/// Processor owning the source chain for the emotion path.
///
/// Availability probed by [`prepare`](Self::prepare) sticks for the life of
/// the processor.
pub struct AssessmentProcessor {
    chain: SourceFallbackChain,
    fusion: WeightedFusion,
    encoder: ReportEncoder,
}

impl AssessmentProcessor {
    pub fn new(chain: SourceFallbackChain) -> Self {
        Self {
            chain,
            fusion: WeightedFusion::new(),
            encoder: ReportEncoder::new(),
        }
    }

    pub fn with_fusion(mut self, fusion: WeightedFusion) -> Self {
        self.fusion = fusion;
        self
    }

    /// Build the configured providers and fusion weights
    pub fn from_config(config: &AffectConfig) -> Result<Self, AssessError> {
        let fusion = WeightedFusion::with_weights(config.fusion)?;
        Ok(Self::new(SourceFallbackChain::from_config(config)?).with_fusion(fusion))
    }

    pub fn chain(&self) -> &SourceFallbackChain {
        &self.chain
    }

    pub fn encoder(&self) -> &ReportEncoder {
        &self.encoder
    }

    /// Probe every provider once
    pub async fn prepare(&mut self) -> Vec<ProbeResult> {
        self.chain.probe().await
    }

    /// Score an image. Always produces a report for a valid image.
    pub async fn assess_image(&self, image: &ImageInput) -> Result<StressReport, AssessError> {
        self.assess_image_with_cancel(image, &CancellationToken::new())
            .await
    }

    pub async fn assess_image_with_cancel(
        &self,
        image: &ImageInput,
        cancel: &CancellationToken,
    ) -> Result<StressReport, AssessError> {
        let source = self.chain.resolve_with_cancel(image, cancel).await?;
        let report = build_stress_report(&source, Utc::now());

        tracing::info!(
            score = report.score,
            level = report.level.as_str(),
            source = %report.source,
            "Emotion assessment complete"
        );

        Ok(report)
    }

    /// Score an image and wrap the result in a report envelope
    pub async fn analyze_image(&self, image: &ImageInput) -> Result<AffectReport, AssessError> {
        let report = self.assess_image(image).await?;
        Ok(self.encoder.encode_stress(report))
    }

    /// Fuse components, taking the facial component from the image.
    ///
    /// A placeholder distribution from the local fallback is never fused;
    /// the facial component is then treated as absent.
    pub async fn fuse_with_image(
        &self,
        mut inputs: ComponentInputs,
        image: &ImageInput,
        cancel: &CancellationToken,
    ) -> Result<FusedAssessment, AssessError> {
        let source = self.chain.resolve_with_cancel(image, cancel).await?;
        if source.kind == SourceKind::LocalFallback {
            tracing::warn!("No provider measured the image, fusing without facial component");
            inputs.facial = None;
        } else {
            inputs.facial = Some(source.distribution);
        }
        self.fusion.fuse(&inputs)
    }

    pub fn fuse(&self, inputs: &ComponentInputs) -> Result<FusedAssessment, AssessError> {
        self.fusion.fuse(inputs)
    }

    /// Run every frame through the chain and summarize the measured ones.
    ///
    /// Frames that only produced a placeholder are skipped. Fails when no
    /// frame was measured.
    pub async fn assess_frames(
        &self,
        frames: &[ImageInput],
        cancel: &CancellationToken,
    ) -> Result<FrameStressSummary, AssessError> {
        if frames.is_empty() {
            return Err(AssessError::InvalidInput("no frames to analyze".to_string()));
        }

        let mut readings = Vec::with_capacity(frames.len());
        for (index, frame) in frames.iter().enumerate() {
            let source = self.chain.resolve_with_cancel(frame, cancel).await?;
            if source.kind == SourceKind::LocalFallback {
                tracing::warn!(frame = index, "Skipping unmeasured frame");
                continue;
            }

            let reading = FrameReading::from_distribution(&source.distribution);
            readings.push(FrameReading {
                confidence: source.provider_confidence.unwrap_or(reading.confidence),
                ..reading
            });
        }

        FrameStress::summarize(&readings).ok_or(AssessError::AllSourcesExhausted {
            attempted: self.chain.len(),
        })
    }

    /// Score a request and wrap the result in a report envelope
    pub fn assess_request(&self, request: &AssessmentRequest) -> Result<AffectReport, AssessError> {
        let assessment = process_request(request)?;
        Ok(self.encoder.encode_assessment(assessment))
    }
}
