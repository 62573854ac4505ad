//! Keyword search across many backends at once.

use std::sync::Arc;

use polytune_backends::BackendRegistry;
use polytune_core::{Capability, Error, Playlist, Result, Track};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::fanout::fan_out;

/// Outcome of parsing a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    Track(Track),
    Playlist { playlist: Playlist, tracks: Vec<Track> },
}

/// Fans queries out to a subset of backends and merges what comes back.
#[derive(Clone)]
pub struct SearchOrchestrator {
    registry: Arc<BackendRegistry>,
    config: EngineConfig,
}

impl SearchOrchestrator {
    pub const fn new(registry: Arc<BackendRegistry>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Search tracks on `backends`, or on every trusted backend when `None`.
    ///
    /// Individual backend failures are absorbed. Fails with
    /// [`Error::NoResults`] only when no backend returned anything.
    pub async fn search(&self, keyword: &str, backends: Option<&[String]>) -> Result<Vec<Track>> {
        let keyword = non_empty(keyword)?;
        let targets = backends.map_or_else(|| self.registry.default_ids(), <[String]>::to_vec);
        let limit = self.config.per_backend_limit;

        let tracks = fan_out(targets, self.config.backend_timeout(), |backend| {
            let registry = Arc::clone(&self.registry);
            let keyword = keyword.clone();
            async move {
                let mut tracks = registry.search(&backend, &keyword).await?;
                if let Some(limit) = limit {
                    tracks.truncate(limit);
                }
                Ok(tracks)
            }
        })
        .await;

        if tracks.is_empty() {
            return Err(Error::NoResults);
        }
        info!("Search {keyword:?}: {} track(s)", tracks.len());
        Ok(tracks)
    }

    /// Search playlists on `backends`, or on every playlist-capable backend.
    pub async fn search_playlists(
        &self,
        keyword: &str,
        backends: Option<&[String]>,
    ) -> Result<Vec<Playlist>> {
        let keyword = non_empty(keyword)?;
        let targets = backends.map_or_else(
            || self.registry.ids_with(Capability::PlaylistSearch),
            <[String]>::to_vec,
        );

        let playlists = fan_out(targets, self.config.backend_timeout(), |backend| {
            let registry = Arc::clone(&self.registry);
            let keyword = keyword.clone();
            async move { registry.search_playlists(&backend, &keyword).await }
        })
        .await;

        if playlists.is_empty() {
            return Err(Error::NoResults);
        }
        info!("Playlist search {keyword:?}: {} playlist(s)", playlists.len());
        Ok(playlists)
    }

    /// Collect recommended playlists. An empty result is not an error.
    pub async fn recommended_playlists(&self, backends: Option<&[String]>) -> Vec<Playlist> {
        let targets = backends.map_or_else(
            || self.registry.ids_with(Capability::Recommend),
            <[String]>::to_vec,
        );

        fan_out(targets, self.config.backend_timeout(), |backend| {
            let registry = Arc::clone(&self.registry);
            async move { registry.recommended_playlists(&backend).await }
        })
        .await
    }

    pub async fn playlist_tracks(&self, backend: &str, playlist_id: &str) -> Result<Vec<Track>> {
        self.registry.playlist_tracks(backend, playlist_id).await
    }

    pub async fn fetch_lyrics(&self, track: &Track) -> Result<String> {
        self.registry.fetch_lyrics(track).await
    }

    /// Resolve a share link into a track, or a playlist with its tracks.
    ///
    /// The single-track parser is tried first, then the playlist parser.
    pub async fn resolve_link(&self, link: &str) -> Result<LinkResolution> {
        let link = link.trim();
        let parsed = url::Url::parse(link).map_err(|_| Error::UnknownLink(link.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::UnknownLink(link.to_string()));
        }

        let backend = self
            .registry
            .detect_source(link)
            .ok_or_else(|| Error::UnknownLink(link.to_string()))?;

        let track_err = match self.registry.parse_link(backend, link).await {
            Ok(track) => return Ok(LinkResolution::Track(track)),
            Err(e) => e,
        };
        debug!("{backend}: not a track link ({track_err})");

        match self.registry.parse_playlist_link(backend, link).await {
            Ok((playlist, tracks)) => Ok(LinkResolution::Playlist { playlist, tracks }),
            Err(e) => Err(Error::LinkParse {
                backend: backend.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn non_empty(keyword: &str) -> Result<String> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(Error::InvalidArgument("empty search keyword".to_string()));
    }
    Ok(keyword.to_string())
}
