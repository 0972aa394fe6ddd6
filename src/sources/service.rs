//! Self-hosted analysis service source
//!
//! Sends the image as base64 JSON to a health-checked analysis service and
//! reads back an emotion mapping with the service's own confidence.

use crate::config::SecondaryConfig;
use crate::error::AssessError;
use crate::normalizer::EmotionNormalizer;
use crate::types::SourceKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{EmotionSource, ImageInput, SourceOutput};

/// Request body of the analysis endpoint
#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    image_data: String,
    user_id: Option<&'a str>,
}

/// Response envelope of the analysis endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisResponse {
    pub success: bool,
    pub data: Option<AnalysisData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisData {
    pub emotions: Value,
    pub dominant_emotion: Option<String>,
    pub confidence: Option<f64>,
    pub processing_time: Option<f64>,
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: Option<String>,
}

/// Remote secondary provider
pub struct AnalysisServiceSource {
    http_client: reqwest::Client,
    health_url: String,
    analyze_url: String,
}

impl AnalysisServiceSource {
    pub fn new(config: &SecondaryConfig, timeout: Duration) -> Result<Self, AssessError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssessError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            health_url: config.health_url(),
            analyze_url: config.analyze_url(),
        })
    }

    fn failed(&self, reason: impl Into<String>) -> AssessError {
        AssessError::SourceFailed {
            source_kind: SourceKind::RemoteSecondary,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl EmotionSource for AnalysisServiceSource {
    fn kind(&self) -> SourceKind {
        SourceKind::RemoteSecondary
    }

    fn name(&self) -> &str {
        "analysis-service"
    }

    async fn probe(&self) -> Result<(), AssessError> {
        let response = self
            .http_client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| self.failed(format!("health check failed: {e}")))?;

        if !response.status().is_success() {
            return Err(self.failed(format!("health check returned HTTP {}", response.status())));
        }

        // A body is optional; when present it must not report a degraded state
        if let Ok(health) = response.json::<HealthResponse>().await {
            if let Some(status) = health.status {
                if status != "healthy" && status != "ok" {
                    return Err(self.failed(format!("service reports status '{status}'")));
                }
            }
        }

        Ok(())
    }

    async fn analyze(&self, image: &ImageInput) -> Result<SourceOutput, AssessError> {
        let body = AnalysisRequest {
            image_data: image.to_base64(),
            user_id: image.user_id(),
        };

        let response = self
            .http_client
            .post(&self.analyze_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.failed(format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.failed(format!("HTTP {}: {}", status.as_u16(), text)));
        }

        let payload: AnalysisResponse = response
            .json()
            .await
            .map_err(|e| AssessError::MalformedProviderResponse(e.to_string()))?;

        parse_analysis(payload)
    }
}

/// Validate an analysis response and normalize its emotion mapping
pub(crate) fn parse_analysis(payload: AnalysisResponse) -> Result<SourceOutput, AssessError> {
    if !payload.success {
        return Err(AssessError::SourceFailed {
            source_kind: SourceKind::RemoteSecondary,
            reason: "service reported success = false".to_string(),
        });
    }

    let data = payload.data.ok_or_else(|| {
        AssessError::MalformedProviderResponse("response has no data section".to_string())
    })?;

    if !data.emotions.is_object() {
        return Err(AssessError::MalformedProviderResponse(
            "emotions must be a label → score mapping".to_string(),
        ));
    }

    let distribution = EmotionNormalizer::normalize_value(&data.emotions)?;

    tracing::debug!(
        dominant = data.dominant_emotion.as_deref().unwrap_or("unknown"),
        processing_time = data.processing_time,
        model_version = data.model_version.as_deref().unwrap_or("unknown"),
        "Analysis service responded"
    );

    Ok(SourceOutput {
        distribution,
        confidence: data.confidence.map(|c| c.clamp(0.0, 1.0)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionCategory;
    use serde_json::json;

    fn response(value: Value) -> AnalysisResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_successful_analysis() {
        let output = parse_analysis(response(json!({
            "success": true,
            "data": {
                "emotions": {"Neutral": 0.5, "Sadness": 0.3, "Anger": 0.2},
                "dominant_emotion": "Neutral",
                "confidence": 0.5,
                "processing_time": 0.12,
                "model_version": "libreface-1.0"
            }
        })))
        .unwrap();

        assert_eq!(output.confidence, Some(0.5));
        assert!((output.distribution.get(EmotionCategory::Sad) - 0.3).abs() < 1e-9);
        assert!((output.distribution.get(EmotionCategory::Angry) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_unsuccessful_analysis_fails_source() {
        let err = parse_analysis(response(json!({"success": false, "data": null}))).unwrap_err();
        assert!(matches!(
            err,
            AssessError::SourceFailed {
                source_kind: SourceKind::RemoteSecondary,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_emotions() {
        let err = parse_analysis(response(json!({
            "success": true,
            "data": {"emotions": [0.1, 0.9]}
        })))
        .unwrap_err();
        assert!(matches!(err, AssessError::MalformedProviderResponse(_)));

        let err = parse_analysis(response(json!({"success": true}))).unwrap_err();
        assert!(matches!(err, AssessError::MalformedProviderResponse(_)));
    }

    #[tokio::test]
    async fn test_probe_fails_when_service_is_down() {
        let config = SecondaryConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..SecondaryConfig::default()
        };
        let source = AnalysisServiceSource::new(&config, Duration::from_secs(2)).unwrap();
        assert!(source.probe().await.is_err());
    }
}
