//! Liveness checks for resolved download links.
//!
//! A probe resolves the track's download URL through its backend and issues a
//! two-byte range request shaped with the backend's header profile. The body
//! is never read.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use polytune_backends::BackendRegistry;
use polytune_core::{Error, HttpError, Result, Track};
use reqwest::header::CONTENT_RANGE;
use reqwest::{Client, StatusCode};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

const PROBE_RANGE: &str = "bytes=0-1";

/// What a detailed probe learned about a track's download link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    /// The link answered with 200 or 206.
    pub valid: bool,
    /// Resolved download URL, empty when resolution failed.
    pub url: String,
    /// Total payload size in bytes, 0 if the host did not say.
    pub size: u64,
    /// Derived bitrate in kbps, 0 when size or duration is unknown.
    pub bitrate: u32,
}

/// Issues range probes against backend download links.
#[derive(Clone)]
pub struct PlayabilityProbe {
    registry: Arc<BackendRegistry>,
    http: Client,
}

impl PlayabilityProbe {
    pub fn new(registry: Arc<BackendRegistry>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { registry, http })
    }

    /// Returns true if the track's download link is live.
    ///
    /// Backends flagged as not validatable always report false, since their
    /// payload cannot be judged without a decrypt step.
    pub async fn probe(&self, track: &Track) -> bool {
        let validatable = self
            .registry
            .get(&track.source)
            .is_some_and(|record| record.is_validatable());
        if !validatable {
            debug!("{}: not validatable, skipping probe", track.source);
            return false;
        }

        self.inspect(track).await.valid
    }

    /// Probe a track and report its URL, size and bitrate.
    pub async fn inspect(&self, track: &Track) -> ProbeReport {
        let url = match self.registry.resolve_download_url(track).await {
            Ok(url) if !url.is_empty() => url,
            Ok(_) => {
                debug!("{}/{}: empty download url", track.source, track.id);
                return ProbeReport::default();
            }
            Err(e) => {
                debug!("{}/{}: {e}", track.source, track.id);
                return ProbeReport::default();
            }
        };

        let mut report = ProbeReport {
            url,
            ..ProbeReport::default()
        };

        match self.range_request(track, &report.url).await {
            Ok((status, size)) => {
                report.valid = matches!(status, StatusCode::OK | StatusCode::PARTIAL_CONTENT);
                if report.valid {
                    report.size = size;
                    report.bitrate = bitrate_kbps(size, track.duration.as_seconds());
                } else {
                    debug!("{}/{}: probe returned {status}", track.source, track.id);
                }
            }
            Err(e) => debug!("{}/{}: probe failed: {e}", track.source, track.id),
        }

        report
    }

    /// Fill size and bitrate for every track whose size is unknown.
    ///
    /// At most `concurrency` probes are in flight at once. Tracks whose probe
    /// fails are left untouched.
    pub async fn enrich_batch(&self, tracks: &mut [Track], concurrency: usize) {
        let permits = Arc::new(Semaphore::new(concurrency.max(1)));
        let found = Arc::new(Mutex::new(Vec::new()));
        let mut tasks = JoinSet::new();

        for (index, track) in tracks.iter().enumerate() {
            if track.size > 0 {
                continue;
            }
            let probe = self.clone();
            let track = track.clone();
            let permits = Arc::clone(&permits);
            let found = Arc::clone(&found);

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                let report = probe.inspect(&track).await;
                if report.valid && report.size > 0 {
                    found.lock().push((index, report));
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("Detail probe task ended abnormally: {e}");
            }
        }

        let found = std::mem::take(&mut *found.lock());
        debug!("Enriched {} track(s)", found.len());
        for (index, report) in found {
            if let Some(track) = tracks.get_mut(index) {
                track.size = report.size;
                track.bitrate = report.bitrate;
            }
        }
    }

    async fn range_request(&self, track: &Track, url: &str) -> Result<(StatusCode, u64)> {
        let record = self
            .registry
            .get(&track.source)
            .ok_or_else(|| Error::UnknownBackend(track.source.clone()))?;
        let credential = self.registry.credential(&track.source);

        let request = record
            .headers()
            .apply(self.http.get(url), credential.as_deref(), Some(PROBE_RANGE));
        let response = request.send().await.map_err(transport_error)?;

        let size = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(total_from_content_range)
            .or_else(|| response.content_length())
            .unwrap_or(0);

        Ok((response.status(), size))
    }
}

/// Total length from a `Content-Range: bytes 0-1/<total>` header.
fn total_from_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Http(HttpError::Timeout)
    } else if e.is_builder() {
        Error::Http(HttpError::InvalidUrl(e.to_string()))
    } else if e.is_connect() {
        Error::Http(HttpError::ConnectionFailed(e.to_string()))
    } else {
        Error::Network(e.to_string())
    }
}

/// Bitrate in kbps, saturating at `u32::MAX` for absurd sizes.
fn bitrate_kbps(size: u64, duration_secs: i64) -> u32 {
    if size == 0 || duration_secs <= 0 {
        return 0;
    }
    let kbps = size.saturating_mul(8) / duration_secs as u64 / 1000;
    u32::try_from(kbps).unwrap_or(u32::MAX)
}
