//! Cross-backend fallback matching.
//!
//! When a track cannot be played from its own backend, the resolver looks
//! for the same song elsewhere: it queries other backends, scores what they
//! return against the reference title, artist and duration, and probes the
//! ranked candidates one at a time until a live download link turns up.

use std::cmp::Ordering;
use std::sync::Arc;

use polytune_backends::BackendRegistry;
use polytune_core::{Capability, Error, Result, Track};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::fanout::fan_out;
use crate::probe::PlayabilityProbe;
use crate::scorer::{combined_score, duration_close};

/// The song being looked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackRequest {
    pub name: String,
    pub artist: String,
    /// Reference duration in seconds, `<= 0` if unknown.
    pub duration: i64,
}

impl FallbackRequest {
    pub fn new(name: impl Into<String>, artist: impl Into<String>, duration: i64) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            duration,
        }
    }

    pub fn from_track(track: &Track) -> Self {
        Self::new(
            track.name.clone(),
            track.artist.clone(),
            track.duration.as_seconds(),
        )
    }

    fn has_artist(&self) -> bool {
        !self.artist.trim().is_empty()
    }

    fn keyword(&self) -> String {
        if self.has_artist() {
            format!("{} {}", self.name.trim(), self.artist.trim())
        } else {
            self.name.trim().to_string()
        }
    }
}

/// A validated substitute found on another backend.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackMatch {
    pub track: Track,
    pub score: f64,
    pub backend: String,
}

/// A scored track awaiting validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub track: Track,
    pub score: f64,
    /// Seconds between the candidate and the reference, 0 if either is
    /// unknown.
    pub duration_delta: i64,
}

impl Candidate {
    fn rank(a: &Self, b: &Self) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.duration_delta.cmp(&b.duration_delta))
    }
}

pub struct FallbackResolver {
    registry: Arc<BackendRegistry>,
    probe: PlayabilityProbe,
    config: EngineConfig,
}

impl FallbackResolver {
    pub const fn new(
        registry: Arc<BackendRegistry>,
        probe: PlayabilityProbe,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            probe,
            config,
        }
    }

    /// Backends eligible to supply a substitute for a track from `origin`.
    ///
    /// An explicit `target` narrows the set to that one backend but is still
    /// subject to the same filters.
    pub fn candidate_backends(&self, origin: &str, target: Option<&str>) -> Vec<String> {
        let pool = match target {
            Some(target) => vec![target.to_string()],
            None => self.registry.ids(),
        };

        pool.into_iter()
            .filter(|id| id != origin)
            .filter(|id| {
                self.registry.get(id).is_some_and(|record| {
                    record.is_validatable() && record.supports(Capability::Search)
                })
            })
            .collect()
    }

    /// Query `backends` and return every acceptable candidate, best first.
    pub async fn candidates(
        &self,
        request: &FallbackRequest,
        backends: Vec<String>,
    ) -> Vec<Candidate> {
        let per_backend = self.config.fallback_candidates_per_backend;

        let mut candidates = fan_out(backends, self.config.backend_timeout(), |backend| {
            let registry = Arc::clone(&self.registry);
            let request = request.clone();
            async move {
                let tracks = search_with_retry(&registry, &backend, &request).await?;
                Ok(score_tracks(&request, tracks, per_backend))
            }
        })
        .await;

        candidates.sort_by(Candidate::rank);
        candidates
    }

    /// Find a playable substitute for `request` outside `origin`.
    ///
    /// Fails with [`Error::NoResults`] when no backend produced an
    /// acceptable candidate and [`Error::NoPlayableMatch`] when candidates
    /// exist but none of their links are live.
    pub async fn resolve(
        &self,
        request: &FallbackRequest,
        origin: &str,
        target: Option<&str>,
    ) -> Result<FallbackMatch> {
        if request.name.trim().is_empty() {
            return Err(Error::InvalidArgument("empty track name".to_string()));
        }

        let backends = self.candidate_backends(origin, target);
        debug!("Fallback for {:?} over {backends:?}", request.name);

        let candidates = self.candidates(request, backends).await;
        if candidates.is_empty() {
            return Err(Error::NoResults);
        }
        debug!("{} candidate(s) for {:?}", candidates.len(), request.name);

        for candidate in candidates {
            if self.probe.probe(&candidate.track).await {
                info!(
                    "Fallback for {:?} matched {}/{} (score {:.2})",
                    request.name, candidate.track.source, candidate.track.id, candidate.score
                );
                return Ok(FallbackMatch {
                    backend: candidate.track.source.clone(),
                    track: candidate.track,
                    score: candidate.score,
                });
            }
        }

        Err(Error::NoPlayableMatch)
    }
}

/// Search with `name artist`, falling back to the bare name when that fails
/// or finds nothing.
async fn search_with_retry(
    registry: &BackendRegistry,
    backend: &str,
    request: &FallbackRequest,
) -> Result<Vec<Track>> {
    let first = registry.search(backend, &request.keyword()).await;
    if !request.has_artist() {
        return first;
    }

    match first {
        Ok(tracks) if !tracks.is_empty() => Ok(tracks),
        Err(e) if e.is_unsupported() => Err(e),
        other => {
            if let Err(e) = &other {
                debug!("{backend}: {e}, retrying with name only");
            }
            registry.search(backend, request.name.trim()).await
        }
    }
}

fn score_tracks(request: &FallbackRequest, tracks: Vec<Track>, limit: usize) -> Vec<Candidate> {
    tracks
        .into_iter()
        .take(limit)
        .filter_map(|track| {
            let score = combined_score(&request.name, &request.artist, &track.name, &track.artist);
            if score <= 0.0 {
                return None;
            }

            let duration = track.duration.as_seconds();
            if !duration_close(request.duration, duration) {
                return None;
            }

            let duration_delta = if request.duration > 0 && duration > 0 {
                (request.duration - duration).abs()
            } else {
                0
            };

            Some(Candidate {
                track,
                score,
                duration_delta,
            })
        })
        .collect()
}
