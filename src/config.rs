//! Engine configuration
//!
//! Provider endpoints, timeouts and fusion weights are plain data owned by
//! the caller and injected into the stages that use them. Loaded from TOML;
//! every field has a default so a partial file is enough.

use crate::error::AssessError;
use crate::fusion::ComponentWeights;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PRIMARY_URL: &str =
    "https://api-inference.huggingface.co/models/trpakov/vit-face-expression";
pub const DEFAULT_SECONDARY_URL: &str = "http://localhost:8000";
pub const DEFAULT_PROBE_SECS: u64 = 5;
pub const DEFAULT_ANALYZE_SECS: u64 = 30;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffectConfig {
    pub primary: PrimaryConfig,
    pub secondary: SecondaryConfig,
    pub timeouts: TimeoutConfig,
    pub fusion: ComponentWeights,
}

/// Hosted inference endpoint (raw image bytes in, label/score pairs out)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryConfig {
    pub enabled: bool,
    pub url: String,
    pub api_token: Option<String>,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_PRIMARY_URL.to_string(),
            api_token: None,
        }
    }
}

/// Self-hosted analysis service (base64 JSON in, emotion mapping out)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryConfig {
    pub enabled: bool,
    pub base_url: String,
    pub health_path: String,
    pub analyze_path: String,
}

impl Default for SecondaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_SECONDARY_URL.to_string(),
            health_path: "/health".to_string(),
            analyze_path: "/analyze/facial-emotion".to_string(),
        }
    }
}

impl SecondaryConfig {
    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }

    pub fn analyze_url(&self) -> String {
        join_url(&self.base_url, &self.analyze_path)
    }
}

/// Per-call timeouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Availability probe timeout (seconds)
    pub probe_secs: u64,
    /// Analysis call timeout (seconds)
    pub analyze_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_secs: DEFAULT_PROBE_SECS,
            analyze_secs: DEFAULT_ANALYZE_SECS,
        }
    }
}

impl TimeoutConfig {
    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }

    pub fn analyze(&self) -> Duration {
        Duration::from_secs(self.analyze_secs)
    }
}

impl AffectConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(toml_str: &str) -> Result<Self, AssessError> {
        let config: AffectConfig =
            toml::from_str(toml_str).map_err(|e| AssessError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, AssessError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AssessError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), AssessError> {
        if self.timeouts.probe_secs == 0 || self.timeouts.analyze_secs == 0 {
            return Err(AssessError::Config("timeouts must be positive".to_string()));
        }
        self.fusion.validate()?;
        if self.primary.enabled && self.primary.url.trim().is_empty() {
            return Err(AssessError::Config(
                "primary.url is required when the primary provider is enabled".to_string(),
            ));
        }
        if self.secondary.enabled && self.secondary.base_url.trim().is_empty() {
            return Err(AssessError::Config(
                "secondary.base_url is required when the secondary provider is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AffectConfig::from_toml_str("").unwrap();
        assert_eq!(config, AffectConfig::default());
        assert_eq!(config.timeouts.probe(), Duration::from_secs(5));
        assert_eq!(config.timeouts.analyze(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_document() {
        let config = AffectConfig::from_toml_str(
            r#"
            [primary]
            api_token = "hf_token"

            [secondary]
            base_url = "http://ai-services:8000/"

            [timeouts]
            probe_secs = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.primary.url, DEFAULT_PRIMARY_URL);
        assert_eq!(config.primary.api_token.as_deref(), Some("hf_token"));
        assert_eq!(config.secondary.health_url(), "http://ai-services:8000/health");
        assert_eq!(
            config.secondary.analyze_url(),
            "http://ai-services:8000/analyze/facial-emotion"
        );
        assert_eq!(config.timeouts.probe_secs, 8);
        assert_eq!(config.timeouts.analyze_secs, DEFAULT_ANALYZE_SECS);
    }

    #[test]
    fn test_invalid_documents() {
        let err = AffectConfig::from_toml_str("[timeouts]\nanalyze_secs = 0").unwrap_err();
        assert!(matches!(err, AssessError::Config(_)));

        let err = AffectConfig::from_toml_str("[primary]\nurl = \"\"").unwrap_err();
        assert!(matches!(err, AssessError::Config(_)));

        // Disabled providers need no endpoint
        assert!(AffectConfig::from_toml_str("[primary]\nenabled = false\nurl = \"\"").is_ok());

        let err = AffectConfig::from_toml_str("timeouts = 3").unwrap_err();
        assert!(matches!(err, AssessError::Config(_)));
    }

    #[test]
    fn test_fusion_weights() {
        let config = AffectConfig::from_toml_str("[fusion]\nfacial = 0.5").unwrap();
        assert_eq!(config.fusion.facial, 0.5);
        assert_eq!(config.fusion.voice, 0.40);

        let err = AffectConfig::from_toml_str("[fusion]\nvoice = -1.0").unwrap_err();
        assert!(matches!(err, AssessError::Config(_)));
    }
}
