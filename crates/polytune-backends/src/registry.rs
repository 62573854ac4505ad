//! Backend registry and capability dispatch.

use std::sync::Arc;

use polytune_core::{Capability, Error, Playlist, Result, Track};
use polytune_credentials::CredentialStore;
use tracing::debug;

use crate::catalog;
use crate::record::BackendRecord;

/// Maps backend ids to their capability records.
///
/// Every dispatch method attaches the backend's current credential and
/// stamps returned tracks and playlists with the backend id, overwriting
/// whatever the backend reported. A missing capability is reported as
/// [`Error::BackendUnsupported`].
pub struct BackendRegistry {
    records: Vec<BackendRecord>,
    credentials: Arc<CredentialStore>,
}

impl BackendRegistry {
    pub const fn new(credentials: Arc<CredentialStore>) -> Self {
        Self {
            records: Vec::new(),
            credentials,
        }
    }

    /// Register a backend, replacing any record with the same id.
    pub fn register(&mut self, record: BackendRecord) {
        debug!("Registering backend {}", record.id);
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            self.records.push(record);
        }
    }

    #[must_use]
    pub fn with_backend(mut self, record: BackendRecord) -> Self {
        self.register(record);
        self
    }

    pub fn get(&self, id: &str) -> Option<&BackendRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All registered backend ids in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    /// Registered ids excluding low-trust backends.
    pub fn default_ids(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| !r.low_trust)
            .map(|r| r.id.clone())
            .collect()
    }

    /// Registered ids whose record implements `capability`.
    pub fn ids_with(&self, capability: Capability) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.supports(capability))
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub const fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Current credential for a backend.
    pub fn credential(&self, id: &str) -> Option<String> {
        self.credentials.get(id)
    }

    /// Find the backend whose share links match `url`.
    ///
    /// When several backends match, catalog priority decides, then
    /// registration order.
    pub fn detect_source(&self, url: &str) -> Option<&str> {
        self.records
            .iter()
            .filter(|r| r.matches_link(url))
            .min_by_key(|r| catalog::link_priority(&r.id))
            .map(|r| r.id.as_str())
    }

    fn record(&self, id: &str) -> Result<&BackendRecord> {
        self.get(id)
            .ok_or_else(|| Error::UnknownBackend(id.to_string()))
    }

    pub async fn search(&self, id: &str, keyword: &str) -> Result<Vec<Track>> {
        let record = self.record(id)?;
        let search = require(record, record.search.as_ref(), Capability::Search)?;
        let credential = self.credential(id);

        let mut tracks = search
            .search(keyword, credential.as_deref())
            .await
            .map_err(|e| Error::backend(id, e))?;
        stamp_tracks(&mut tracks, id);
        Ok(tracks)
    }

    pub async fn resolve_download_url(&self, track: &Track) -> Result<String> {
        let record = self.record(&track.source)?;
        let resolver = require(
            record,
            record.resolver.as_ref(),
            Capability::ResolveDownloadUrl,
        )?;
        let credential = self.credential(&track.source);

        resolver
            .resolve_download_url(track, credential.as_deref())
            .await
            .map_err(|e| Error::backend(&track.source, e))
    }

    pub async fn fetch_lyrics(&self, track: &Track) -> Result<String> {
        let record = self.record(&track.source)?;
        let lyrics = require(record, record.lyrics.as_ref(), Capability::Lyrics)?;
        let credential = self.credential(&track.source);

        lyrics
            .fetch_lyrics(track, credential.as_deref())
            .await
            .map_err(|e| Error::backend(&track.source, e))
    }

    pub async fn search_playlists(&self, id: &str, keyword: &str) -> Result<Vec<Playlist>> {
        let record = self.record(id)?;
        let search = require(
            record,
            record.playlist_search.as_ref(),
            Capability::PlaylistSearch,
        )?;
        let credential = self.credential(id);

        let mut playlists = search
            .search_playlists(keyword, credential.as_deref())
            .await
            .map_err(|e| Error::backend(id, e))?;
        stamp_playlists(&mut playlists, id);
        Ok(playlists)
    }

    pub async fn playlist_tracks(&self, id: &str, playlist_id: &str) -> Result<Vec<Track>> {
        let record = self.record(id)?;
        let listing = require(
            record,
            record.playlist_tracks.as_ref(),
            Capability::PlaylistTracks,
        )?;
        let credential = self.credential(id);

        let mut tracks = listing
            .playlist_tracks(playlist_id, credential.as_deref())
            .await
            .map_err(|e| Error::backend(id, e))?;
        stamp_tracks(&mut tracks, id);
        Ok(tracks)
    }

    pub async fn parse_link(&self, id: &str, url: &str) -> Result<Track> {
        let record = self.record(id)?;
        let parser = require(record, record.link_parser.as_ref(), Capability::ParseLink)?;
        let credential = self.credential(id);

        let mut track = parser
            .parse_link(url, credential.as_deref())
            .await
            .map_err(|e| Error::backend(id, e))?;
        id.clone_into(&mut track.source);
        Ok(track)
    }

    pub async fn parse_playlist_link(&self, id: &str, url: &str) -> Result<(Playlist, Vec<Track>)> {
        let record = self.record(id)?;
        let parser = require(
            record,
            record.playlist_link_parser.as_ref(),
            Capability::ParsePlaylistLink,
        )?;
        let credential = self.credential(id);

        let (mut playlist, mut tracks) = parser
            .parse_playlist_link(url, credential.as_deref())
            .await
            .map_err(|e| Error::backend(id, e))?;
        id.clone_into(&mut playlist.source);
        stamp_tracks(&mut tracks, id);
        Ok((playlist, tracks))
    }

    pub async fn recommended_playlists(&self, id: &str) -> Result<Vec<Playlist>> {
        let record = self.record(id)?;
        let recommender = require(record, record.recommender.as_ref(), Capability::Recommend)?;
        let credential = self.credential(id);

        let mut playlists = recommender
            .recommended_playlists(credential.as_deref())
            .await
            .map_err(|e| Error::backend(id, e))?;
        stamp_playlists(&mut playlists, id);
        Ok(playlists)
    }
}

fn require<'a, T: ?Sized>(
    record: &BackendRecord,
    handle: Option<&'a Arc<T>>,
    capability: Capability,
) -> Result<&'a Arc<T>> {
    handle.ok_or_else(|| Error::BackendUnsupported {
        backend: record.id.clone(),
        capability,
    })
}

fn stamp_tracks(tracks: &mut [Track], id: &str) {
    for track in tracks {
        id.clone_into(&mut track.source);
    }
}

fn stamp_playlists(playlists: &mut [Playlist], id: &str) {
    for playlist in playlists {
        id.clone_into(&mut playlist.source);
    }
}
