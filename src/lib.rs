//! Synheart Affect - Multi-source emotion and stress scoring engine
//!
//! Affect turns facial-emotion provider output and DASS questionnaire
//! responses into stress and severity reports:
//!
//! - **Emotion path**: image → ordered provider fallback → normalized
//!   seven-category distribution → weighted 0-100 stress score
//! - **Questionnaire path**: item responses → per-subscale DASS scores →
//!   severity labels, optionally combined with voice-derived readings
//! - **Fusion path**: voice, sentiment, keyword and facial indicators →
//!   weighted subscale scores with risk and completeness
//!
//! The core never fails for a valid image: when every provider fails, a
//! placeholder distribution tagged `local_fallback` is returned and marked
//! non-authoritative in the report envelope.

pub mod aggregator;
pub mod chain;
pub mod config;
pub mod error;
pub mod frames;
pub mod fusion;
pub mod interpret;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod scoring;
pub mod severity;
pub mod sources;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use aggregator::{MultiModalAggregator, CALIBRATION_OFFSET};
pub use chain::{first_success, Attempt, ProbeResult, SourceFallbackChain};
pub use config::AffectConfig;
pub use error::AssessError;
pub use frames::{FrameReading, FrameStress, FrameStressSummary};
pub use fusion::{ComponentInputs, ComponentWeights, FusedAssessment, WeightedFusion};
pub use normalizer::EmotionNormalizer;
pub use pipeline::{
    fuse_components, process_request, requests_to_reports, score_combined, score_questionnaire,
    AssessmentProcessor,
};
pub use report::{AffectReport, ReportEncoder, REPORT_VERSION};
pub use scoring::{ItemMap, StressScorer};
pub use severity::SeverityClassifier;
pub use sources::{EmotionSource, ImageInput};

// Schema exports
pub use schema::{AssessmentRequest, RequestAdapter, SCHEMA_VERSION};

/// Library version embedded in every report
pub const AFFECT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report envelopes
pub const PRODUCER_NAME: &str = "synheart-affect";
