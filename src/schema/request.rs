//! assessment.request.v1 schema definition
//!
//! One record per questionnaire submission:
//! - `questionnaire`: item responses only
//! - `combined`: item responses plus per-question voice readings

use crate::error::AssessError;
use crate::scoring::{
    interleaved_assignments, overfull_subscale, ItemMap, DASS21_ITEM_COUNT, DASS21_SCALE_FACTOR,
    MAX_ITEM_RESPONSE, MAX_SCALE_FACTOR,
};
use crate::types::{DassCategory, VoiceReading};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version
pub const SCHEMA_VERSION: &str = "assessment.request.v1";

/// Kind of assessment requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Questionnaire,
    Combined,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Questionnaire => "questionnaire",
            RequestKind::Combined => "combined",
        }
    }
}

/// Item → subscale layout of the submitted form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormSpec {
    /// Standard DASS-21 short form
    #[default]
    Dass21,
    /// Round-robin depression/anxiety/stress assignment of any length
    Interleaved {
        #[serde(default = "default_scale_factor")]
        scale_factor: u32,
    },
    /// Explicit assignment per item
    Custom {
        assignments: Vec<DassCategory>,
        #[serde(default = "default_scale_factor")]
        scale_factor: u32,
    },
}

impl FormSpec {
    pub fn scale_factor(&self) -> u32 {
        match self {
            FormSpec::Dass21 => DASS21_SCALE_FACTOR,
            FormSpec::Interleaved { scale_factor } | FormSpec::Custom { scale_factor, .. } => {
                *scale_factor
            }
        }
    }
}

fn default_scale_factor() -> u32 {
    DASS21_SCALE_FACTOR
}

/// The main assessment.request.v1 record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// Schema version identifier
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub kind: RequestKind,
    #[serde(default)]
    pub form: FormSpec,
    /// Item responses in form order. Signed so out-of-range values reach
    /// validation instead of failing deserialization.
    pub responses: Vec<i64>,
    /// Per-question voice readings (combined requests only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voice: Vec<VoiceReading>,
}

impl AssessmentRequest {
    /// Create a questionnaire-only request
    pub fn questionnaire(form: FormSpec, responses: Vec<i64>) -> Self {
        AssessmentRequest {
            schema_version: SCHEMA_VERSION.to_string(),
            request_id: Some(uuid::Uuid::new_v4().to_string()),
            user_id: None,
            submitted_at: None,
            kind: RequestKind::Questionnaire,
            form,
            responses,
            voice: Vec::new(),
        }
    }

    /// Create a combined questionnaire + voice request
    pub fn combined(form: FormSpec, responses: Vec<i64>, voice: Vec<VoiceReading>) -> Self {
        AssessmentRequest {
            kind: RequestKind::Combined,
            voice,
            ..Self::questionnaire(form, responses)
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Validate the request schema
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ValidationError::InvalidSchemaVersion {
                expected: SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }

        let expected = match &self.form {
            FormSpec::Dass21 => Some(DASS21_ITEM_COUNT),
            FormSpec::Interleaved { .. } => None,
            FormSpec::Custom { assignments, .. } => {
                if assignments.is_empty() {
                    return Err(ValidationError::MissingAssignments);
                }
                Some(assignments.len())
            }
        };

        let scale_factor = self.form.scale_factor();
        if !(1..=MAX_SCALE_FACTOR).contains(&scale_factor) {
            return Err(ValidationError::InvalidScaleFactor(scale_factor));
        }

        if self.responses.is_empty() {
            return Err(ValidationError::NoResponses);
        }
        if let Some(expected) = expected {
            if self.responses.len() != expected {
                return Err(ValidationError::WrongResponseCount {
                    expected,
                    actual: self.responses.len(),
                });
            }
        }

        let overfull = match &self.form {
            FormSpec::Dass21 => None,
            FormSpec::Interleaved { .. } => overfull_subscale(
                &interleaved_assignments(self.responses.len()),
                scale_factor,
            ),
            FormSpec::Custom { assignments, .. } => overfull_subscale(assignments, scale_factor),
        };
        if let Some(category) = overfull {
            return Err(ValidationError::SubscaleTooLong {
                category: category.as_str().to_string(),
            });
        }

        if let Some((index, value)) = self
            .responses
            .iter()
            .enumerate()
            .find(|(_, value)| !(0..=i64::from(MAX_ITEM_RESPONSE)).contains(*value))
        {
            return Err(ValidationError::ResponseOutOfRange {
                index,
                value: *value,
            });
        }

        match (self.kind, self.voice.is_empty()) {
            (RequestKind::Combined, true) => {
                return Err(ValidationError::KindMismatch {
                    kind: self.kind.as_str().to_string(),
                    detail: "combined requests need at least one voice reading".to_string(),
                })
            }
            (RequestKind::Questionnaire, false) => {
                return Err(ValidationError::KindMismatch {
                    kind: self.kind.as_str().to_string(),
                    detail: "questionnaire requests carry no voice readings".to_string(),
                })
            }
            _ => {}
        }

        for (index, reading) in self.voice.iter().enumerate() {
            for category in DassCategory::ALL {
                if let Some(value) = reading.get(category) {
                    if !value.is_finite() || value < 0.0 {
                        return Err(ValidationError::InvalidVoiceReading {
                            index,
                            category: category.as_str().to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Item map for the submitted form
    pub fn item_map(&self) -> Result<ItemMap, AssessError> {
        match &self.form {
            FormSpec::Dass21 => Ok(ItemMap::dass21()),
            FormSpec::Interleaved { scale_factor } => {
                ItemMap::interleaved(self.responses.len(), *scale_factor)
            }
            FormSpec::Custom {
                assignments,
                scale_factor,
            } => ItemMap::custom(assignments.clone(), *scale_factor),
        }
    }

    /// Responses narrowed to the item range
    pub fn item_responses(&self) -> Result<Vec<u8>, AssessError> {
        self.responses
            .iter()
            .map(|value| {
                u8::try_from(*value)
                    .ok()
                    .filter(|v| *v <= MAX_ITEM_RESPONSE)
                    .ok_or_else(|| {
                        AssessError::InvalidInput(format!(
                            "response must be between 0-{MAX_ITEM_RESPONSE}, got {value}"
                        ))
                    })
            })
            .collect()
    }
}

/// Validation errors for assessment requests
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid schema version: expected {expected}, got {actual}")]
    InvalidSchemaVersion { expected: String, actual: String },

    #[error("Request has no responses")]
    NoResponses,

    #[error("Expected {expected} responses for this form, got {actual}")]
    WrongResponseCount { expected: usize, actual: usize },

    #[error("Response {index} is out of range 0-3: {value}")]
    ResponseOutOfRange { index: usize, value: i64 },

    #[error("Custom form has no item assignments")]
    MissingAssignments,

    #[error("Scale factor must be between 1-2, got {0}")]
    InvalidScaleFactor(u32),

    #[error("Form lets {category} exceed 42 points")]
    SubscaleTooLong { category: String },

    #[error("Request kind {kind} is inconsistent: {detail}")]
    KindMismatch { kind: String, detail: String },

    #[error("Voice reading {index} has an invalid {category} value")]
    InvalidVoiceReading { index: usize, category: String },
}
