//! Engine tuning knobs.

use std::time::Duration;

use serde::Deserialize;

/// Default cap on tracks merged from one backend during a search.
pub const DEFAULT_PER_BACKEND_LIMIT: usize = 10;

/// Tracks per backend considered as fallback candidates.
pub const DEFAULT_FALLBACK_CANDIDATES: usize = 8;

/// Timeout for a single playability probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Concurrent probes during batch size/bitrate enrichment.
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 5;

/// Configuration shared by the orchestrator, probe and resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap each backend's contribution to a search. `None` keeps everything.
    pub per_backend_limit: Option<usize>,
    /// Tracks per backend scored during fallback resolution.
    pub fallback_candidates_per_backend: usize,
    /// Probe request timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Ceiling on concurrent detail probes.
    pub detail_concurrency: usize,
    /// Optional bound on each backend task in a fan-out, in milliseconds.
    /// Unset leaves it to the backend client's own timeout.
    pub backend_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            per_backend_limit: Some(DEFAULT_PER_BACKEND_LIMIT),
            fallback_candidates_per_backend: DEFAULT_FALLBACK_CANDIDATES,
            probe_timeout_ms: millis(DEFAULT_PROBE_TIMEOUT),
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
            backend_timeout_ms: None,
        }
    }
}

impl EngineConfig {
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn backend_timeout(&self) -> Option<Duration> {
        self.backend_timeout_ms.map(Duration::from_millis)
    }

    pub const fn with_per_backend_limit(mut self, limit: Option<usize>) -> Self {
        self.per_backend_limit = limit;
        self
    }

    pub const fn with_fallback_candidates(mut self, per_backend: usize) -> Self {
        self.fallback_candidates_per_backend = per_backend;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout_ms = millis(timeout);
        self
    }

    pub const fn with_detail_concurrency(mut self, concurrency: usize) -> Self {
        self.detail_concurrency = concurrency;
        self
    }

    pub fn with_backend_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.backend_timeout_ms = timeout.map(millis);
        self
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.per_backend_limit, Some(10));
        assert_eq!(config.fallback_candidates_per_backend, 8);
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.detail_concurrency, 5);
        assert_eq!(config.backend_timeout(), None);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"per_backend_limit": null, "backend_timeout_ms": 12000}"#)
                .unwrap();
        assert_eq!(config.per_backend_limit, None);
        assert_eq!(config.backend_timeout(), Some(Duration::from_secs(12)));
        assert_eq!(config.fallback_candidates_per_backend, 8);
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_sub_second_timeouts_survive() {
        let config = EngineConfig::default()
            .with_probe_timeout(Duration::from_millis(500))
            .with_backend_timeout(Some(Duration::from_millis(1500)));
        assert_eq!(config.probe_timeout(), Duration::from_millis(500));
        assert_eq!(config.backend_timeout(), Some(Duration::from_millis(1500)));
    }
}
