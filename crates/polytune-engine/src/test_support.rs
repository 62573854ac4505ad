//! In-memory backends for engine tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use polytune_backends::{
    BackendRecord, BackendRegistry, DownloadResolver, HeaderProfile, LinkParser,
    PlaylistLinkParser, PlaylistSearch, TrackSearch,
};
use polytune_core::{Error, Playlist, Result, Track};
use polytune_credentials::CredentialStore;
use tempfile::TempDir;

pub fn track(source: &str, id: &str, name: &str, artist: &str) -> Track {
    Track::new(source, id, name).with_artist(artist)
}

/// Registry over a throwaway credential file.
pub fn registry_with(backends: Vec<MockBackend>) -> (TempDir, BackendRegistry) {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let store = Arc::new(CredentialStore::new(dir.path().join("credentials.json")));
    let registry = backends
        .into_iter()
        .fold(BackendRegistry::new(store), |registry, backend| {
            registry.with_backend(backend.into_record())
        });
    (dir, registry)
}

struct ScriptedSearch {
    /// `None` makes unmatched keywords fail.
    default: Option<Vec<Track>>,
    by_keyword: HashMap<String, Vec<Track>>,
    queries: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TrackSearch for ScriptedSearch {
    async fn search(&self, keyword: &str, _: Option<&str>) -> Result<Vec<Track>> {
        self.queries.lock().push(keyword.to_string());
        if let Some(tracks) = self.by_keyword.get(keyword) {
            return Ok(tracks.clone());
        }
        self.default
            .clone()
            .ok_or_else(|| Error::Network("search endpoint unreachable".into()))
    }
}

struct UrlResolver {
    base: String,
    ids: Vec<String>,
}

#[async_trait]
impl DownloadResolver for UrlResolver {
    async fn resolve_download_url(&self, track: &Track, _: Option<&str>) -> Result<String> {
        if self.ids.contains(&track.id) {
            Ok(format!("{}/audio/{}", self.base, track.id))
        } else {
            Err(Error::Parse(format!("no url for {}", track.id)))
        }
    }
}

struct FixedPlaylists(Vec<Playlist>);

#[async_trait]
impl PlaylistSearch for FixedPlaylists {
    async fn search_playlists(&self, _: &str, _: Option<&str>) -> Result<Vec<Playlist>> {
        Ok(self.0.clone())
    }
}

struct FixedLink(Track);

#[async_trait]
impl LinkParser for FixedLink {
    async fn parse_link(&self, _: &str, _: Option<&str>) -> Result<Track> {
        Ok(self.0.clone())
    }
}

struct FixedPlaylistLink(Playlist, Vec<Track>);

#[async_trait]
impl PlaylistLinkParser for FixedPlaylistLink {
    async fn parse_playlist_link(
        &self,
        _: &str,
        _: Option<&str>,
    ) -> Result<(Playlist, Vec<Track>)> {
        Ok((self.0.clone(), self.1.clone()))
    }
}

/// Builder for a scripted backend. Searches return nothing unless told
/// otherwise.
pub struct MockBackend {
    record: BackendRecord,
    search: Option<ScriptedSearch>,
}

impl MockBackend {
    pub fn new(id: &str) -> Self {
        Self {
            record: BackendRecord::known(id),
            search: Some(ScriptedSearch {
                default: Some(Vec::new()),
                by_keyword: HashMap::new(),
                queries: Arc::default(),
            }),
        }
    }

    pub fn returning(mut self, tracks: Vec<Track>) -> Self {
        if let Some(search) = &mut self.search {
            search.default = Some(tracks);
        }
        self
    }

    /// Answer `keyword` with `tracks`, overriding the default.
    pub fn answering(mut self, keyword: &str, tracks: Vec<Track>) -> Self {
        if let Some(search) = &mut self.search {
            search.by_keyword.insert(keyword.to_string(), tracks);
        }
        self
    }

    pub fn failing(mut self) -> Self {
        if let Some(search) = &mut self.search {
            search.default = None;
        }
        self
    }

    pub fn without_search(mut self) -> Self {
        self.search = None;
        self
    }

    /// Keywords this backend has been searched with.
    pub fn queries(&self) -> Arc<Mutex<Vec<String>>> {
        self.search
            .as_ref()
            .map_or_else(Arc::default, |s| Arc::clone(&s.queries))
    }

    /// Resolve `ids` to `{base}/audio/{id}`; anything else fails.
    pub fn serving(mut self, base: &str, ids: &[&str]) -> Self {
        self.record = self.record.with_resolver(Arc::new(UrlResolver {
            base: base.to_string(),
            ids: ids.iter().map(|id| (*id).to_string()).collect(),
        }));
        self
    }

    pub fn resolving_with(mut self, resolver: Arc<dyn DownloadResolver>) -> Self {
        self.record = self.record.with_resolver(resolver);
        self
    }

    pub fn with_profile(mut self, profile: HeaderProfile) -> Self {
        self.record = self.record.with_headers(profile);
        self
    }

    pub fn with_playlists(mut self, playlists: Vec<Playlist>) -> Self {
        self.record = self
            .record
            .with_playlist_search(Arc::new(FixedPlaylists(playlists)));
        self
    }

    pub fn parsing_link(mut self, track: Track) -> Self {
        self.record = self.record.with_link_parser(Arc::new(FixedLink(track)));
        self
    }

    pub fn parsing_playlist_link(mut self, playlist: Playlist, tracks: Vec<Track>) -> Self {
        self.record = self
            .record
            .with_playlist_link_parser(Arc::new(FixedPlaylistLink(playlist, tracks)));
        self
    }

    fn into_record(self) -> BackendRecord {
        match self.search {
            Some(search) => self.record.with_search(Arc::new(search)),
            None => self.record,
        }
    }
}
