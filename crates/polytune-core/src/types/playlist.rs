//! Playlist type representing a backend-hosted collection of tracks.

use serde::{Deserialize, Serialize};

use super::BackendId;

/// A playlist as reported by a specific backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    /// Backend the playlist was found on.
    pub source: BackendId,
    /// Backend-scoped playlist ID.
    pub id: String,
    /// Playlist title.
    pub name: String,
    /// Owner/author name.
    pub creator: String,
    /// Number of tracks, 0 when unknown.
    pub track_count: u32,
    /// Cover image URL.
    pub cover: Option<String>,
    /// Playlist description.
    pub description: Option<String>,
}

impl Playlist {
    pub fn new(
        source: impl Into<BackendId>,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get subtitle text showing creator and track count.
    pub fn subtitle(&self) -> String {
        let mut parts = Vec::new();

        if !self.creator.is_empty() {
            parts.push(self.creator.clone());
        }

        if self.track_count > 0 {
            let tracks = if self.track_count == 1 { "track" } else { "tracks" };
            parts.push(format!("{} {tracks}", self.track_count));
        }

        parts.join(" \u{2022} ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_creation() {
        let playlist = Playlist::new("kuwo", "playlist_id", "My Playlist");
        assert_eq!(playlist.source, "kuwo");
        assert_eq!(playlist.id, "playlist_id");
        assert_eq!(playlist.track_count, 0);
    }

    #[test]
    fn test_playlist_subtitle() {
        let mut playlist = Playlist::new("qq", "id", "Title");
        playlist.creator = "User".to_string();
        playlist.track_count = 10;
        assert_eq!(playlist.subtitle(), "User \u{2022} 10 tracks");

        playlist.creator.clear();
        playlist.track_count = 1;
        assert_eq!(playlist.subtitle(), "1 track");
    }
}
