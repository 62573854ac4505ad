//! Capability record for a single backend.

use std::fmt;
use std::sync::Arc;

use polytune_core::Capability;

use crate::capability::{
    DownloadResolver, LinkParser, LyricsFetcher, PlaylistLinkParser, PlaylistRecommender,
    PlaylistSearch, PlaylistTracks, TrackSearch,
};
use crate::catalog;
use crate::headers::HeaderProfile;

/// Everything the registry knows about one backend: its flags, request
/// shaping and whichever capabilities it implements.
#[derive(Clone)]
pub struct BackendRecord {
    pub(crate) id: String,
    pub(crate) description: String,
    pub(crate) low_trust: bool,
    pub(crate) validatable: bool,
    pub(crate) headers: HeaderProfile,
    pub(crate) link_hosts: Vec<String>,

    pub(crate) search: Option<Arc<dyn TrackSearch>>,
    pub(crate) resolver: Option<Arc<dyn DownloadResolver>>,
    pub(crate) lyrics: Option<Arc<dyn LyricsFetcher>>,
    pub(crate) playlist_search: Option<Arc<dyn PlaylistSearch>>,
    pub(crate) playlist_tracks: Option<Arc<dyn PlaylistTracks>>,
    pub(crate) link_parser: Option<Arc<dyn LinkParser>>,
    pub(crate) playlist_link_parser: Option<Arc<dyn PlaylistLinkParser>>,
    pub(crate) recommender: Option<Arc<dyn PlaylistRecommender>>,
}

impl BackendRecord {
    /// A trusted, validatable backend with no capabilities yet.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            description: id.clone(),
            id,
            low_trust: false,
            validatable: true,
            headers: HeaderProfile::default(),
            link_hosts: Vec::new(),
            search: None,
            resolver: None,
            lyrics: None,
            playlist_search: None,
            playlist_tracks: None,
            link_parser: None,
            playlist_link_parser: None,
            recommender: None,
        }
    }

    /// A record pre-filled from the built-in catalog when `id` is well known.
    pub fn known(id: &str) -> Self {
        let record = Self::new(id);
        let Some(entry) = catalog::lookup(id) else {
            return record;
        };

        let mut headers = HeaderProfile {
            user_agent: entry.user_agent,
            referer: None,
        };
        if let Some(referer) = entry.referer {
            headers = headers.with_referer(referer);
        }

        Self {
            description: entry.description.to_string(),
            low_trust: entry.low_trust,
            validatable: entry.validatable,
            headers,
            link_hosts: entry.link_hosts.iter().map(|h| (*h).to_string()).collect(),
            ..record
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Excluded from the default search subset.
    pub const fn is_low_trust(&self) -> bool {
        self.low_trust
    }

    /// Downloads can be checked with a plain range request.
    pub const fn is_validatable(&self) -> bool {
        self.validatable
    }

    pub const fn headers(&self) -> &HeaderProfile {
        &self.headers
    }

    /// Returns true if `url` looks like one of this backend's share links.
    pub fn matches_link(&self, url: &str) -> bool {
        self.link_hosts.iter().any(|host| url.contains(host.as_str()))
    }

    pub const fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Search => self.search.is_some(),
            Capability::ResolveDownloadUrl => self.resolver.is_some(),
            Capability::Lyrics => self.lyrics.is_some(),
            Capability::PlaylistSearch => self.playlist_search.is_some(),
            Capability::PlaylistTracks => self.playlist_tracks.is_some(),
            Capability::ParseLink => self.link_parser.is_some(),
            Capability::ParsePlaylistLink => self.playlist_link_parser.is_some(),
            Capability::Recommend => self.recommender.is_some(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn low_trust(mut self, low_trust: bool) -> Self {
        self.low_trust = low_trust;
        self
    }

    #[must_use]
    pub const fn validatable(mut self, validatable: bool) -> Self {
        self.validatable = validatable;
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderProfile) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_link_host(mut self, host: impl Into<String>) -> Self {
        self.link_hosts.push(host.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: Arc<dyn TrackSearch>) -> Self {
        self.search = Some(search);
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn DownloadResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn with_lyrics(mut self, lyrics: Arc<dyn LyricsFetcher>) -> Self {
        self.lyrics = Some(lyrics);
        self
    }

    #[must_use]
    pub fn with_playlist_search(mut self, playlist_search: Arc<dyn PlaylistSearch>) -> Self {
        self.playlist_search = Some(playlist_search);
        self
    }

    #[must_use]
    pub fn with_playlist_tracks(mut self, playlist_tracks: Arc<dyn PlaylistTracks>) -> Self {
        self.playlist_tracks = Some(playlist_tracks);
        self
    }

    #[must_use]
    pub fn with_link_parser(mut self, link_parser: Arc<dyn LinkParser>) -> Self {
        self.link_parser = Some(link_parser);
        self
    }

    #[must_use]
    pub fn with_playlist_link_parser(mut self, parser: Arc<dyn PlaylistLinkParser>) -> Self {
        self.playlist_link_parser = Some(parser);
        self
    }

    #[must_use]
    pub fn with_recommender(mut self, recommender: Arc<dyn PlaylistRecommender>) -> Self {
        self.recommender = Some(recommender);
        self
    }
}

impl fmt::Debug for BackendRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRecord")
            .field("id", &self.id)
            .field("low_trust", &self.low_trust)
            .field("validatable", &self.validatable)
            .field("headers", &self.headers)
            .field("search", &self.search.is_some())
            .field("resolver", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::UserAgent;

    #[test]
    fn test_known_pulls_catalog_defaults() {
        let migu = BackendRecord::known("migu");
        assert_eq!(migu.description(), "Migu Music");
        assert_eq!(migu.headers().user_agent, UserAgent::Mobile);
        assert_eq!(migu.headers().referer.as_deref(), Some("http://music.migu.cn/"));
        assert!(migu.matches_link("https://music.migu.cn/v3/music/song/1"));
        assert!(!migu.matches_link("https://music.163.com/#/song?id=1"));

        let soda = BackendRecord::known("soda");
        assert!(!soda.is_validatable());
    }

    #[test]
    fn test_unknown_id_is_plain() {
        let record = BackendRecord::new("custom").low_trust(true);
        assert_eq!(record.description(), "custom");
        assert!(record.is_low_trust());
        assert!(record.is_validatable());
        assert_eq!(record.headers().user_agent, UserAgent::Desktop);
        assert!(!record.supports(Capability::Search));
    }
}
