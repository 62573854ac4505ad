//! Track type representing a single song reported by one backend.

use serde::{Deserialize, Serialize};

use super::{format_size, BackendId, Duration};

/// A single track as reported by a specific backend.
///
/// Identity is `(source, id)`; ids are only unique within one backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    /// Backend the track was found on.
    pub source: BackendId,
    /// Backend-scoped track ID.
    pub id: String,
    /// Track title.
    pub name: String,
    /// Artist name(s) as reported by the backend.
    pub artist: String,
    /// Album name, empty when unknown.
    pub album: String,
    /// Track duration.
    pub duration: Duration,
    /// Payload size in bytes, 0 when unknown.
    pub size: u64,
    /// Bitrate in kbps, 0 when unknown.
    pub bitrate: u32,
    /// Cover image URL.
    pub cover: Option<String>,
}

impl Track {
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

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, seconds: i64) -> Self {
        self.duration = Duration::from_seconds(seconds);
        self
    }

    /// Returns true if this track and `other` refer to the same backend entity.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.source == other.source && self.id == other.id
    }

    /// Get the size formatted in megabytes.
    pub fn format_size(&self) -> String {
        format_size(self.size)
    }

    /// Build a filesystem-safe `"{artist} - {name}.{ext}"` file name.
    pub fn filename(&self, ext: &str) -> String {
        let ext = if ext.is_empty() { "mp3" } else { ext };
        format!(
            "{} - {}.{ext}",
            sanitize_filename(&self.artist),
            sanitize_filename(&self.name)
        )
    }
}

fn sanitize_filename(name: &str) -> String {
    const ILLEGAL: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

    let cleaned: String = name
        .chars()
        .map(|c| if ILLEGAL.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_creation() {
        let track = Track::new("netease", "abc123", "Test Song").with_duration(200);
        assert_eq!(track.source, "netease");
        assert_eq!(track.id, "abc123");
        assert_eq!(track.duration.as_seconds(), 200);
        assert_eq!(track.size, 0);
    }

    #[test]
    fn test_identity_is_backend_scoped() {
        let a = Track::new("qq", "1", "Song");
        let b = Track::new("kugou", "1", "Song");
        assert!(!a.same_identity(&b));
        assert!(a.same_identity(&Track::new("qq", "1", "Other title")));
    }

    #[test]
    fn test_filename_sanitized() {
        let track = Track::new("qq", "1", "What? / Why").with_artist("AC:DC");
        assert_eq!(track.filename("flac"), "AC_DC - What_ _ Why.flac");

        let anonymous = Track::new("qq", "2", "  ");
        assert_eq!(anonymous.filename(""), "unknown - unknown.mp3");
    }
}
