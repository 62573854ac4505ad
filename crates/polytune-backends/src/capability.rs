//! Capability traits a backend may implement.
//!
//! Each capability is a separate trait so a backend only implements what it
//! actually supports. Every call receives the backend's stored credential,
//! `None` meaning anonymous access.

use async_trait::async_trait;
use polytune_core::{Playlist, Result, Track};

/// Keyword track search.
#[async_trait]
pub trait TrackSearch: Send + Sync {
    async fn search(&self, keyword: &str, credential: Option<&str>) -> Result<Vec<Track>>;
}

/// Resolution of a transient download URL for a track.
#[async_trait]
pub trait DownloadResolver: Send + Sync {
    async fn resolve_download_url(&self, track: &Track, credential: Option<&str>)
        -> Result<String>;
}

/// Lyrics lookup (LRC text).
#[async_trait]
pub trait LyricsFetcher: Send + Sync {
    async fn fetch_lyrics(&self, track: &Track, credential: Option<&str>) -> Result<String>;
}

/// Keyword playlist search.
#[async_trait]
pub trait PlaylistSearch: Send + Sync {
    async fn search_playlists(
        &self,
        keyword: &str,
        credential: Option<&str>,
    ) -> Result<Vec<Playlist>>;
}

/// Listing the tracks of a playlist by id.
#[async_trait]
pub trait PlaylistTracks: Send + Sync {
    async fn playlist_tracks(&self, playlist_id: &str, credential: Option<&str>)
        -> Result<Vec<Track>>;
}

/// Parsing a single-track share link.
#[async_trait]
pub trait LinkParser: Send + Sync {
    async fn parse_link(&self, url: &str, credential: Option<&str>) -> Result<Track>;
}

/// Parsing a playlist share link.
#[async_trait]
pub trait PlaylistLinkParser: Send + Sync {
    async fn parse_playlist_link(
        &self,
        url: &str,
        credential: Option<&str>,
    ) -> Result<(Playlist, Vec<Track>)>;
}

/// Backend-curated playlist recommendations.
#[async_trait]
pub trait PlaylistRecommender: Send + Sync {
    async fn recommended_playlists(&self, credential: Option<&str>) -> Result<Vec<Playlist>>;
}
