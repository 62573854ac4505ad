//! Common types shared across the workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a registered backend (e.g. `"netease"`).
pub type BackendId = String;

/// Track duration in whole seconds. Zero or negative means unknown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Duration(pub i64);

impl Duration {
    pub const UNKNOWN: Self = Self(0);

    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub const fn as_seconds(&self) -> i64 {
        self.0
    }

    pub const fn is_known(&self) -> bool {
        self.0 > 0
    }

    /// Format as M:SS or H:MM:SS, `-` when unknown.
    pub fn format(&self) -> String {
        if !self.is_known() {
            return "-".to_string();
        }

        let total_secs = self.0;
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes}:{seconds:02}")
        }
    }
}

impl From<i64> for Duration {
    fn from(seconds: i64) -> Self {
        Self(seconds)
    }
}

impl From<Duration> for i64 {
    fn from(d: Duration) -> Self {
        d.0
    }
}

/// Format a byte count as megabytes, `-` when unknown.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "-".to_string();
    }
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// An optional operation a backend may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Search,
    ResolveDownloadUrl,
    Lyrics,
    PlaylistSearch,
    PlaylistTracks,
    ParseLink,
    ParsePlaylistLink,
    Recommend,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Search => "search",
            Self::ResolveDownloadUrl => "download url resolution",
            Self::Lyrics => "lyrics",
            Self::PlaylistSearch => "playlist search",
            Self::PlaylistTracks => "playlist tracks",
            Self::ParseLink => "link parsing",
            Self::ParsePlaylistLink => "playlist link parsing",
            Self::Recommend => "playlist recommendations",
        };
        f.write_str(name)
    }
}
