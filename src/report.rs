//! Report encoding
//!
//! This module builds the emotion-path [`StressReport`] from a resolved
//! source and wraps any result kind into a versioned JSON envelope carrying
//! producer and provenance metadata.

use crate::error::AssessError;
use crate::frames::FrameStressSummary;
use crate::fusion::FusedAssessment;
use crate::scoring::StressScorer;
use crate::severity::SeverityClassifier;
use crate::types::{DassAssessment, ScoreSource, StressReport};
use crate::{AFFECT_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Envelope version written into every report
pub const REPORT_VERSION: &str = "affect.report.v1";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Where the result came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportProvenance {
    /// Source tag (`remote_primary`, `local_fallback`, `questionnaire`, ...)
    pub source: String,
    /// False for placeholder results that must not be shown as measurements
    pub authoritative: bool,
    pub computed_at_utc: String,
}

/// Report payload
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    Emotion(StressReport),
    Questionnaire(DassAssessment),
    Fusion(FusedAssessment),
    Frames(FrameStressSummary),
}

/// Versioned report envelope
#[derive(Debug, Clone, Serialize)]
pub struct AffectReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub result: ReportBody,
}

/// Build the emotion-path stress report for a resolved source.
///
/// Confidence is the provider's own figure when it reports one, otherwise the
/// share of the dominant category.
pub fn build_stress_report(source: &ScoreSource, at: DateTime<Utc>) -> StressReport {
    let score = StressScorer::score_from_emotion(&source.distribution);
    let (dominant_category, share) = source.distribution.dominant();

    StressReport {
        score,
        level: SeverityClassifier::classify_stress_score(score),
        dominant_category,
        confidence: source.provider_confidence.unwrap_or(share).clamp(0.0, 1.0),
        source: source.kind,
        timestamp_ms: at.timestamp_millis(),
        distribution: source.distribution,
    }
}

/// Encoder for report envelopes
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn encode_stress(&self, report: StressReport) -> AffectReport {
        let provenance = ReportProvenance {
            source: report.source.as_str().to_string(),
            authoritative: report.source.is_authoritative(),
            computed_at_utc: Utc::now().to_rfc3339(),
        };
        self.envelope(provenance, ReportBody::Emotion(report))
    }

    pub fn encode_assessment(&self, assessment: DassAssessment) -> AffectReport {
        let source = if assessment.voice_adjusted {
            "questionnaire_voice"
        } else {
            "questionnaire"
        };
        let provenance = ReportProvenance {
            source: source.to_string(),
            authoritative: true,
            computed_at_utc: Utc::now().to_rfc3339(),
        };
        self.envelope(provenance, ReportBody::Questionnaire(assessment))
    }

    pub fn encode_fusion(&self, fused: FusedAssessment) -> AffectReport {
        let provenance = ReportProvenance {
            source: "weighted_fusion".to_string(),
            authoritative: true,
            computed_at_utc: Utc::now().to_rfc3339(),
        };
        self.envelope(provenance, ReportBody::Fusion(fused))
    }

    /// Frame summaries only ever contain measured frames
    pub fn encode_frames(&self, summary: FrameStressSummary) -> AffectReport {
        let provenance = ReportProvenance {
            source: "multi_frame".to_string(),
            authoritative: true,
            computed_at_utc: Utc::now().to_rfc3339(),
        };
        self.envelope(provenance, ReportBody::Frames(summary))
    }

    /// Encode to a pretty JSON string
    pub fn to_json(&self, report: &AffectReport) -> Result<String, AssessError> {
        serde_json::to_string_pretty(report).map_err(AssessError::JsonError)
    }

    fn envelope(&self, provenance: ReportProvenance, result: ReportBody) -> AffectReport {
        AffectReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: AFFECT_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance,
            result,
        }
    }
}
