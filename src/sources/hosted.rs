//! Hosted inference source
//!
//! Posts raw image bytes to a hosted image-classification endpoint and reads
//! back an array of `{label, score}` pairs.

use crate::config::PrimaryConfig;
use crate::error::AssessError;
use crate::normalizer::EmotionNormalizer;
use crate::types::{EmotionDistribution, SourceKind};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::{EmotionSource, ImageInput, SourceOutput};

const USER_AGENT: &str = concat!("synheart-affect/", env!("CARGO_PKG_VERSION"));

/// Remote primary provider
pub struct HostedInferenceSource {
    http_client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

impl HostedInferenceSource {
    pub fn new(config: &PrimaryConfig, timeout: Duration) -> Result<Self, AssessError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AssessError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Whether an endpoint is configured at all
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    fn failed(&self, reason: impl Into<String>) -> AssessError {
        AssessError::SourceFailed {
            source_kind: SourceKind::RemotePrimary,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl EmotionSource for HostedInferenceSource {
    fn kind(&self) -> SourceKind {
        SourceKind::RemotePrimary
    }

    fn name(&self) -> &str {
        "hosted-inference"
    }

    async fn probe(&self) -> Result<(), AssessError> {
        // Hosted endpoints expose no health route; only configuration is checked
        if self.is_configured() {
            Ok(())
        } else {
            Err(self.failed("no endpoint configured"))
        }
    }

    async fn analyze(&self, image: &ImageInput) -> Result<SourceOutput, AssessError> {
        tracing::debug!(
            bytes = image.bytes().len(),
            "Posting image to hosted inference endpoint"
        );

        let mut request = self
            .http_client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.bytes().to_vec());

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.failed(format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.failed(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AssessError::MalformedProviderResponse(e.to_string()))?;

        let distribution = parse_label_scores(&payload)?;
        Ok(SourceOutput {
            distribution,
            confidence: None,
        })
    }
}

/// Validate and normalize a `[{label, score}]` response.
///
/// Some endpoints wrap the pairs in one more array (one entry per input
/// image); the first entry is used.
pub(crate) fn parse_label_scores(payload: &Value) -> Result<EmotionDistribution, AssessError> {
    let pairs = match payload {
        Value::Array(items) => match items.first() {
            Some(Value::Array(_)) => &items[0],
            _ => payload,
        },
        _ => {
            return Err(AssessError::MalformedProviderResponse(
                "expected an array of label/score pairs".to_string(),
            ))
        }
    };

    match pairs.as_array() {
        Some(items) if !items.is_empty() => EmotionNormalizer::normalize_value(pairs),
        _ => Err(AssessError::MalformedProviderResponse(
            "provider returned no label/score pairs".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionCategory;
    use serde_json::json;

    #[test]
    fn test_parse_flat_pairs() {
        let payload = json!([
            {"label": "happy", "score": 0.6},
            {"label": "sad", "score": 0.3},
            {"label": "angry", "score": 0.1}
        ]);
        let dist = parse_label_scores(&payload).unwrap();
        assert!((dist.get(EmotionCategory::Happy) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_parse_nested_pairs() {
        let payload = json!([[{"label": "fear", "score": 0.9}, {"label": "neutral", "score": 0.1}]]);
        let dist = parse_label_scores(&payload).unwrap();
        assert_eq!(dist.dominant().0, EmotionCategory::Fear);
    }

    #[test]
    fn test_shape_failures() {
        for payload in [json!([]), json!([[]]), json!({"error": "loading"}), json!([1, 2])] {
            let err = parse_label_scores(&payload).unwrap_err();
            assert!(
                matches!(err, AssessError::MalformedProviderResponse(_)),
                "{payload}"
            );
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_source_failure() {
        let config = PrimaryConfig {
            enabled: true,
            url: "http://127.0.0.1:9/models/fer".to_string(),
            api_token: Some("token".to_string()),
        };
        let source = HostedInferenceSource::new(&config, Duration::from_secs(2)).unwrap();
        let image = ImageInput::new(vec![0xFF, 0xD8, 0xFF], None).unwrap();

        let err = source.analyze(&image).await.unwrap_err();
        assert!(matches!(
            err,
            AssessError::SourceFailed {
                source_kind: SourceKind::RemotePrimary,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_probe_requires_endpoint() {
        let config = PrimaryConfig {
            enabled: true,
            url: String::new(),
            api_token: None,
        };
        let source = HostedInferenceSource::new(&config, Duration::from_secs(1)).unwrap();
        assert!(source.probe().await.is_err());
    }
}
