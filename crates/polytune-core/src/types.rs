//! Core domain types for Polytune.

pub mod common;
pub mod playlist;
pub mod track;

pub use common::{format_size, BackendId, Capability, Duration};
pub use playlist::Playlist;
pub use track::Track;
