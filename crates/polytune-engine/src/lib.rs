//! # polytune-engine
//!
//! Aggregation and fallback matching over many music backends.
//!
//! ## Features
//!
//! - **Fan-out search**: query every backend concurrently and merge whatever
//!   comes back, absorbing individual failures
//! - **Fuzzy matching**: title/artist similarity and duration closeness
//! - **Playability probes**: two-byte range requests shaped per backend
//! - **Fallback resolution**: find the same song on another backend when the
//!   original source cannot serve it
//!
//! ## Example
//!
//! ```ignore
//! use polytune_engine::{BackendRegistry, CredentialStore, Engine, EngineConfig};
//!
//! let credentials = Arc::new(CredentialStore::open(CredentialStore::default_path()?));
//! let registry = BackendRegistry::new(credentials).with_backend(netease_record());
//! let engine = Engine::new(registry, EngineConfig::default())?;
//!
//! let tracks = engine.search("晴天", None).await?;
//! let substitute = engine.resolve_fallback(&tracks[0], &tracks[0].source, None).await?;
//! ```

pub mod config;
pub mod fallback;
mod fanout;
pub mod probe;
pub mod scorer;
pub mod search;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tracing::info;

pub use config::EngineConfig;
pub use fallback::{Candidate, FallbackMatch, FallbackRequest, FallbackResolver};
pub use polytune_backends::{BackendRecord, BackendRegistry, HeaderProfile, UserAgent};
pub use polytune_core::{Error, Playlist, Result, Track};
pub use polytune_credentials::CredentialStore;
pub use probe::{PlayabilityProbe, ProbeReport};
pub use search::{LinkResolution, SearchOrchestrator};

/// Entry point tying the registry, search, probe and fallback together.
pub struct Engine {
    registry: Arc<BackendRegistry>,
    config: EngineConfig,
    search: SearchOrchestrator,
    probe: PlayabilityProbe,
    fallback: FallbackResolver,
}

impl Engine {
    pub fn new(registry: BackendRegistry, config: EngineConfig) -> Result<Self> {
        let registry = Arc::new(registry);
        let probe = PlayabilityProbe::new(Arc::clone(&registry), config.probe_timeout())?;
        let search = SearchOrchestrator::new(Arc::clone(&registry), config.clone());
        let fallback = FallbackResolver::new(Arc::clone(&registry), probe.clone(), config.clone());

        info!("Engine ready with {} backend(s)", registry.len());
        Ok(Self {
            registry,
            config,
            search,
            probe,
            fallback,
        })
    }

    pub const fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        self.registry.credentials()
    }

    /// Search tracks. `None` searches every trusted backend.
    pub async fn search(&self, keyword: &str, backends: Option<&[String]>) -> Result<Vec<Track>> {
        self.search.search(keyword, backends).await
    }

    pub async fn search_playlists(
        &self,
        keyword: &str,
        backends: Option<&[String]>,
    ) -> Result<Vec<Playlist>> {
        self.search.search_playlists(keyword, backends).await
    }

    pub async fn recommended_playlists(&self, backends: Option<&[String]>) -> Vec<Playlist> {
        self.search.recommended_playlists(backends).await
    }

    pub async fn playlist_tracks(&self, backend: &str, playlist_id: &str) -> Result<Vec<Track>> {
        self.search.playlist_tracks(backend, playlist_id).await
    }

    pub async fn resolve_link(&self, link: &str) -> Result<LinkResolution> {
        self.search.resolve_link(link).await
    }

    pub async fn fetch_lyrics(&self, track: &Track) -> Result<String> {
        self.search.fetch_lyrics(track).await
    }

    pub async fn resolve_download_url(&self, track: &Track) -> Result<String> {
        self.registry.resolve_download_url(track).await
    }

    /// Returns true if the track's download link currently answers.
    pub async fn probe(&self, track: &Track) -> bool {
        self.probe.probe(track).await
    }

    pub async fn inspect(&self, track: &Track) -> ProbeReport {
        self.probe.inspect(track).await
    }

    /// Fill size and bitrate for tracks that lack them.
    pub async fn enrich_batch(&self, tracks: &mut [Track]) {
        self.probe
            .enrich_batch(tracks, self.config.detail_concurrency)
            .await;
    }

    /// Find a playable copy of `track` on a backend other than `exclude`.
    ///
    /// With `target` set only that backend is searched.
    pub async fn resolve_fallback(
        &self,
        track: &Track,
        exclude: &str,
        target: Option<&str>,
    ) -> Result<FallbackMatch> {
        self.fallback
            .resolve(&FallbackRequest::from_track(track), exclude, target)
            .await
    }

    /// Like [`Engine::resolve_fallback`] for a bare title/artist/duration.
    pub async fn resolve_fallback_request(
        &self,
        request: &FallbackRequest,
        exclude: &str,
        target: Option<&str>,
    ) -> Result<FallbackMatch> {
        self.fallback.resolve(request, exclude, target).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_support::{registry_with, track, MockBackend};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_then_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/audio/k7"))
            .respond_with(ResponseTemplate::new(206))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let (_dir, registry) = registry_with(vec![
            MockBackend::new("netease")
                .returning(vec![track("", "n1", "晴天", "周杰伦").with_duration(269)])
                .serving(&server.uri(), &["n1"]),
            MockBackend::new("kugou")
                .returning(vec![track("", "k7", "晴天", "周杰伦").with_duration(270)])
                .serving(&server.uri(), &["k7"]),
        ]);
        let engine = Engine::new(registry, EngineConfig::default()).unwrap();

        let netease = ["netease".to_string()];
        let tracks = engine.search("晴天", Some(&netease[..])).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert!(!engine.probe(&tracks[0]).await);

        let found = engine
            .resolve_fallback(&tracks[0], &tracks[0].source, None)
            .await
            .unwrap();
        assert_eq!(found.backend, "kugou");
        assert_eq!(found.track.id, "k7");
    }

    #[tokio::test]
    async fn test_credentials_reach_backends() {
        let (_dir, registry) = registry_with(vec![MockBackend::new("qq")]);
        let engine = Engine::new(registry, EngineConfig::default()).unwrap();

        engine.credentials().set_all([("qq", "uin=1")]);
        assert_eq!(engine.registry().credential("qq").as_deref(), Some("uin=1"));
        engine.credentials().save().unwrap();
        engine.credentials().load().unwrap();
        assert_eq!(engine.credentials().get("qq").as_deref(), Some("uin=1"));
    }
}
