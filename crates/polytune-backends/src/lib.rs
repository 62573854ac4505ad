//! # polytune-backends
//!
//! Capability contract and registry for external music-catalog backends.
//!
//! Every backend is an opaque provider of some subset of capabilities
//! (search, download URL resolution, lyrics, playlists, link parsing). A
//! [`BackendRecord`] holds whichever capabilities a backend implements and
//! the [`BackendRegistry`] dispatches calls by backend id, attaching the
//! backend's stored credential to every call.

pub mod capability;
pub mod catalog;
pub mod headers;
pub mod record;
pub mod registry;

pub use capability::{
    DownloadResolver, LinkParser, LyricsFetcher, PlaylistLinkParser, PlaylistRecommender,
    PlaylistSearch, PlaylistTracks, TrackSearch,
};
pub use headers::{HeaderProfile, UserAgent};
pub use record::BackendRecord;
pub use registry::BackendRegistry;
