//! Source fallback chain
//!
//! Sources are tried strictly in priority order and the first success wins;
//! later sources are never called. When every source fails the chain
//! synthesizes a placeholder distribution tagged `local_fallback` instead of
//! failing the request.
//!
//! The resolver itself ([`first_success`]) is a plain function over a list of
//! lazy suppliers. [`SourceFallbackChain`] only owns the configured sources
//! and their availability, which the caller controls.

use crate::config::{AffectConfig, TimeoutConfig};
use crate::error::AssessError;
use crate::sources::{
    AnalysisServiceSource, EmotionSource, HostedInferenceSource, ImageInput, SourceOutput,
    SyntheticFallback,
};
use crate::types::{ScoreSource, SourceKind};
use futures::future::{BoxFuture, FutureExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Deferred call to one source
pub type Supplier<'a> = Box<dyn FnOnce() -> BoxFuture<'a, Result<SourceOutput, AssessError>> + Send + 'a>;

/// One entry in an ordered resolution
pub struct Attempt<'a> {
    pub kind: SourceKind,
    pub name: String,
    pub timeout: Duration,
    pub supplier: Supplier<'a>,
}

/// Run suppliers in order and return the first success.
///
/// Each supplier is only invoked once every earlier one has failed. Errors
/// and timeouts are logged and skipped. Returns `AllSourcesExhausted` when
/// nothing succeeded and `Cancelled` as soon as `cancel` fires.
pub async fn first_success(
    attempts: Vec<Attempt<'_>>,
    cancel: &CancellationToken,
) -> Result<ScoreSource, AssessError> {
    let attempted = attempts.len();

    for attempt in attempts {
        if cancel.is_cancelled() {
            return Err(AssessError::Cancelled);
        }

        tracing::debug!(source = %attempt.name, kind = %attempt.kind, "Trying source");
        let started = Instant::now();
        let call = tokio::time::timeout(attempt.timeout, (attempt.supplier)());

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AssessError::Cancelled),
            outcome = call => outcome,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let error = match outcome {
            Ok(Ok(output)) => {
                tracing::info!(
                    source = %attempt.name,
                    kind = %attempt.kind,
                    elapsed_ms,
                    "Source produced emotion distribution"
                );
                return Ok(ScoreSource {
                    kind: attempt.kind,
                    distribution: output.distribution,
                    provider_confidence: output.confidence,
                });
            }
            Ok(Err(e)) => e,
            Err(_) => AssessError::Timeout {
                source_kind: attempt.kind,
                after: attempt.timeout,
            },
        };

        tracing::warn!(
            source = %attempt.name,
            kind = %attempt.kind,
            elapsed_ms,
            error = %error,
            "Source failed, advancing"
        );
    }

    Err(AssessError::AllSourcesExhausted { attempted })
}

/// Result of probing one source
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub kind: SourceKind,
    pub available: bool,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

struct ChainEntry {
    source: Arc<dyn EmotionSource>,
    available: bool,
}

/// Ordered set of emotion sources with caller-owned availability
pub struct SourceFallbackChain {
    entries: Vec<ChainEntry>,
    probe_timeout: Duration,
    analyze_timeout: Duration,
    fallback_seed: Option<u64>,
}

impl SourceFallbackChain {
    /// Create an empty chain with the given timeouts
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        Self {
            entries: Vec::new(),
            probe_timeout: timeouts.probe(),
            analyze_timeout: timeouts.analyze(),
            fallback_seed: None,
        }
    }

    /// Build the primary and secondary providers enabled in `config`
    pub fn from_config(config: &AffectConfig) -> Result<Self, AssessError> {
        config.validate()?;
        let analyze_timeout = config.timeouts.analyze();
        let mut chain = Self::new(&config.timeouts);

        if config.primary.enabled {
            chain = chain.with_source(Arc::new(HostedInferenceSource::new(
                &config.primary,
                analyze_timeout,
            )?));
        }
        if config.secondary.enabled {
            chain = chain.with_source(Arc::new(AnalysisServiceSource::new(
                &config.secondary,
                analyze_timeout,
            )?));
        }

        Ok(chain)
    }

    /// Append a source at the lowest priority
    pub fn with_source(mut self, source: Arc<dyn EmotionSource>) -> Self {
        self.entries.push(ChainEntry {
            source,
            available: true,
        });
        self
    }

    /// Make the local fallback deterministic
    pub fn with_fallback_seed(mut self, seed: u64) -> Self {
        self.fallback_seed = Some(seed);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark a source (by position) as available or not
    pub fn set_available(&mut self, index: usize, available: bool) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.available = available;
        }
    }

    /// Availability of each source in priority order
    pub fn availability(&self) -> Vec<(String, SourceKind, bool)> {
        self.entries
            .iter()
            .map(|e| (e.source.name().to_string(), e.source.kind(), e.available))
            .collect()
    }

    /// Probe every source once. Sources that fail stay skipped for the
    /// life of this chain.
    pub async fn probe(&mut self) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(self.entries.len());

        for entry in &mut self.entries {
            let started = Instant::now();
            let outcome = tokio::time::timeout(self.probe_timeout, entry.source.probe()).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let error = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(_) => Some(format!("probe timed out after {:?}", self.probe_timeout)),
            };

            entry.available = error.is_none();
            if let Some(reason) = &error {
                tracing::warn!(
                    source = entry.source.name(),
                    elapsed_ms,
                    reason = %reason,
                    "Source unavailable, skipping for this process"
                );
            } else {
                tracing::info!(source = entry.source.name(), elapsed_ms, "Source available");
            }

            results.push(ProbeResult {
                name: entry.source.name().to_string(),
                kind: entry.source.kind(),
                available: entry.available,
                elapsed_ms,
                error,
            });
        }

        results
    }

    /// Resolve an image to a tagged distribution. Never fails for a valid
    /// image: exhaustion falls back to the synthetic distribution.
    pub async fn resolve(&self, image: &ImageInput) -> Result<ScoreSource, AssessError> {
        self.resolve_with_cancel(image, &CancellationToken::new()).await
    }

    /// Like [`resolve`](Self::resolve), abandoning the in-flight call when
    /// `cancel` fires.
    pub async fn resolve_with_cancel(
        &self,
        image: &ImageInput,
        cancel: &CancellationToken,
    ) -> Result<ScoreSource, AssessError> {
        let attempts: Vec<Attempt<'_>> = self
            .entries
            .iter()
            .filter(|entry| entry.available)
            .map(|entry| {
                let source = Arc::clone(&entry.source);
                Attempt {
                    kind: source.kind(),
                    name: source.name().to_string(),
                    timeout: self.analyze_timeout,
                    supplier: Box::new(move || async move { source.analyze(image).await }.boxed()),
                }
            })
            .collect();

        match first_success(attempts, cancel).await {
            Err(AssessError::AllSourcesExhausted { attempted }) => {
                tracing::warn!(
                    attempted,
                    "All sources exhausted, using non-authoritative local fallback"
                );
                Ok(self.synthesize())
            }
            other => other,
        }
    }

    fn synthesize(&self) -> ScoreSource {
        let mut rng = match self.fallback_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ScoreSource {
            kind: SourceKind::LocalFallback,
            distribution: SyntheticFallback::generate(&mut rng),
            provider_confidence: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::EmotionNormalizer;
    use crate::types::EmotionCategory;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    enum Behavior {
        Succeed,
        Fail,
        Malformed,
        Hang,
    }

    struct MockSource {
        kind: SourceKind,
        behavior: Behavior,
        probe_ok: bool,
        calls: Arc<AtomicUsize>,
    }

    impl MockSource {
        fn new(kind: SourceKind, behavior: Behavior) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Arc::new(Self {
                kind,
                behavior,
                probe_ok: true,
                calls: Arc::clone(&calls),
            });
            (source, calls)
        }

        fn unreachable(kind: SourceKind) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Arc::new(Self {
                kind,
                behavior: Behavior::Succeed,
                probe_ok: false,
                calls: Arc::clone(&calls),
            });
            (source, calls)
        }
    }

    #[async_trait]
    impl EmotionSource for MockSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn name(&self) -> &str {
            "mock"
        }

        async fn probe(&self) -> Result<(), AssessError> {
            if self.probe_ok {
                Ok(())
            } else {
                Err(AssessError::SourceFailed {
                    source_kind: self.kind,
                    reason: "connection refused".to_string(),
                })
            }
        }

        async fn analyze(&self, _image: &ImageInput) -> Result<SourceOutput, AssessError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => {
                    let raw: HashMap<String, f64> =
                        [("fear".to_string(), 0.9), ("neutral".to_string(), 0.1)].into();
                    Ok(SourceOutput {
                        distribution: EmotionNormalizer::normalize(&raw)?,
                        confidence: Some(0.9),
                    })
                }
                Behavior::Fail => Err(AssessError::SourceFailed {
                    source_kind: self.kind,
                    reason: "HTTP 503".to_string(),
                }),
                Behavior::Malformed => Err(AssessError::MalformedProviderResponse(
                    "empty array".to_string(),
                )),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Err(AssessError::Cancelled)
                }
            }
        }
    }

    fn image() -> ImageInput {
        ImageInput::new(vec![1, 2, 3], None).unwrap()
    }

    fn chain_of(sources: Vec<Arc<MockSource>>) -> SourceFallbackChain {
        let timeouts = TimeoutConfig {
            probe_secs: 1,
            analyze_secs: 1,
        };
        let seeded = SourceFallbackChain::new(&timeouts).with_fallback_seed(11);
        sources
            .into_iter()
            .fold(seeded, |chain, source| chain.with_source(source))
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let (a, a_calls) = MockSource::new(SourceKind::RemotePrimary, Behavior::Fail);
        let (b, b_calls) = MockSource::new(SourceKind::RemoteSecondary, Behavior::Succeed);
        let (c, c_calls) = MockSource::new(SourceKind::RemoteSecondary, Behavior::Succeed);
        let chain = chain_of(vec![a, b, c]);

        let resolved = chain.resolve(&image()).await.unwrap();

        assert_eq!(resolved.kind, SourceKind::RemoteSecondary);
        assert_eq!(resolved.provider_confidence, Some(0.9));
        assert_eq!(resolved.distribution.dominant().0, EmotionCategory::Fear);
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_success_skips_everything_else() {
        let (a, _) = MockSource::new(SourceKind::RemotePrimary, Behavior::Succeed);
        let (b, b_calls) = MockSource::new(SourceKind::RemoteSecondary, Behavior::Succeed);
        let chain = chain_of(vec![a, b]);

        let resolved = chain.resolve(&image()).await.unwrap();
        assert_eq!(resolved.kind, SourceKind::RemotePrimary);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failures_fall_back_locally() {
        let (a, a_calls) = MockSource::new(SourceKind::RemotePrimary, Behavior::Fail);
        let (b, b_calls) = MockSource::new(SourceKind::RemoteSecondary, Behavior::Malformed);
        let (c, c_calls) = MockSource::new(SourceKind::RemoteSecondary, Behavior::Fail);
        let chain = chain_of(vec![a, b, c]);

        let resolved = chain.resolve(&image()).await.unwrap();

        assert_eq!(resolved.kind, SourceKind::LocalFallback);
        assert!(!resolved.kind.is_authoritative());
        assert!((resolved.distribution.total() - 1.0).abs() < 1e-9);
        assert_eq!(resolved.distribution.iter().count(), 7);
        for calls in [a_calls, b_calls, c_calls] {
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_empty_chain_falls_back_locally() {
        let chain = chain_of(Vec::new());
        let resolved = chain.resolve(&image()).await.unwrap();
        assert_eq!(resolved.kind, SourceKind::LocalFallback);
    }

    #[tokio::test]
    async fn test_timeout_advances_to_next_source() {
        let (a, _) = MockSource::new(SourceKind::RemotePrimary, Behavior::Hang);
        let (b, b_calls) = MockSource::new(SourceKind::RemoteSecondary, Behavior::Succeed);

        let attempts = vec![a, b]
            .into_iter()
            .map(|source| {
                let kind = source.kind();
                Attempt {
                    kind,
                    name: "mock".to_string(),
                    timeout: Duration::from_millis(50),
                    supplier: Box::new(move || async move { source.analyze(&image()).await }.boxed())
                        as Supplier<'static>,
                }
            })
            .collect();

        let resolved = first_success(attempts, &CancellationToken::new()).await.unwrap();
        assert_eq!(resolved.kind, SourceKind::RemoteSecondary);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_success_reports_exhaustion() {
        let (a, _) = MockSource::new(SourceKind::RemotePrimary, Behavior::Fail);
        let attempts = vec![Attempt {
            kind: SourceKind::RemotePrimary,
            name: "mock".to_string(),
            timeout: Duration::from_secs(1),
            supplier: Box::new(move || async move { a.analyze(&image()).await }.boxed()),
        }];

        let err = first_success(attempts, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, AssessError::AllSourcesExhausted { attempted: 1 }));
    }

    #[tokio::test]
    async fn test_unavailable_sources_are_skipped() {
        let (a, a_calls) = MockSource::unreachable(SourceKind::RemotePrimary);
        let (b, b_calls) = MockSource::new(SourceKind::RemoteSecondary, Behavior::Succeed);
        let mut chain = chain_of(vec![a, b]);

        let probes = chain.probe().await;
        assert_eq!(probes.len(), 2);
        assert!(!probes[0].available);
        assert!(probes[0].error.is_some());
        assert!(probes[1].available);

        for _ in 0..3 {
            let resolved = chain.resolve(&image()).await.unwrap();
            assert_eq!(resolved.kind, SourceKind::RemoteSecondary);
        }
        assert_eq!(a_calls.load(Ordering::SeqCst), 0);
        assert_eq!(b_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_caller_controls_availability() {
        let (a, a_calls) = MockSource::new(SourceKind::RemotePrimary, Behavior::Succeed);
        let mut chain = chain_of(vec![a]);
        chain.set_available(0, false);

        let resolved = chain.resolve(&image()).await.unwrap();
        assert_eq!(resolved.kind, SourceKind::LocalFallback);
        assert_eq!(a_calls.load(Ordering::SeqCst), 0);
        assert!(!chain.availability()[0].2);
    }

    #[tokio::test]
    async fn test_cancellation_abandons_in_flight_call() {
        let (a, _) = MockSource::new(SourceKind::RemotePrimary, Behavior::Hang);
        let (b, b_calls) = MockSource::new(SourceKind::RemoteSecondary, Behavior::Succeed);
        let chain = chain_of(vec![a, b]);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let image = image();
        let err = chain.resolve_with_cancel(&image, &cancel).await.unwrap_err();
        assert!(matches!(err, AssessError::Cancelled));
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }
}
