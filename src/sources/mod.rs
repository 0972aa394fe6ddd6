//! Emotion scoring sources
//!
//! This module provides the providers the fallback chain can call. Each
//! source turns a validated image into a normalized emotion distribution or
//! fails; failures are folded into "source failed" by the chain.

mod hosted;
mod service;
mod synthetic;

pub use hosted::HostedInferenceSource;
pub use service::AnalysisServiceSource;
pub use synthetic::{SyntheticFallback, FALLBACK_RANGES};

use crate::error::AssessError;
use crate::types::{EmotionDistribution, SourceKind};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Image payload submitted for facial-emotion analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    bytes: Vec<u8>,
    user_id: Option<String>,
}

impl ImageInput {
    /// Wrap raw image bytes. An empty payload is invalid input.
    pub fn new(bytes: Vec<u8>, user_id: Option<String>) -> Result<Self, AssessError> {
        if bytes.is_empty() {
            return Err(AssessError::InvalidInput("image payload is empty".to_string()));
        }
        Ok(Self { bytes, user_id })
    }

    /// Decode a base64 image, with or without a `data:` URL prefix
    pub fn from_base64(encoded: &str, user_id: Option<String>) -> Result<Self, AssessError> {
        let body = match encoded.split_once(',') {
            Some((_, body)) => body,
            None => encoded,
        };
        let bytes = STANDARD
            .decode(body.trim())
            .map_err(|e| AssessError::InvalidInput(format!("image is not valid base64: {e}")))?;
        Self::new(bytes, user_id)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Successful output of a single source
#[derive(Debug, Clone)]
pub struct SourceOutput {
    pub distribution: EmotionDistribution,
    /// Confidence reported by the provider, when it reports one
    pub confidence: Option<f64>,
}

/// Trait for emotion scoring sources
#[async_trait]
pub trait EmotionSource: Send + Sync {
    /// Tag recorded on results produced by this source
    fn kind(&self) -> SourceKind;

    /// Human-readable identifier used in logs and doctor output
    fn name(&self) -> &str;

    /// Availability probe, run once when the chain is prepared
    async fn probe(&self) -> Result<(), AssessError> {
        Ok(())
    }

    /// Analyze an image into an emotion distribution
    async fn analyze(&self, image: &ImageInput) -> Result<SourceOutput, AssessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_image_is_invalid() {
        let err = ImageInput::new(Vec::new(), None).unwrap_err();
        assert!(matches!(err, AssessError::InvalidInput(_)));
    }

    #[test]
    fn test_base64_with_data_url_prefix() {
        let image = ImageInput::from_base64("data:image/png;base64,AQID", Some("u1".into())).unwrap();
        assert_eq!(image.bytes(), &[1, 2, 3]);
        assert_eq!(image.user_id(), Some("u1"));
        assert_eq!(image.to_base64(), "AQID");
    }

    #[test]
    fn test_invalid_base64_is_invalid_input() {
        let err = ImageInput::from_base64("not base64!!", None).unwrap_err();
        assert!(matches!(err, AssessError::InvalidInput(_)));

        let err = ImageInput::from_base64("", None).unwrap_err();
        assert!(matches!(err, AssessError::InvalidInput(_)));
    }
}
