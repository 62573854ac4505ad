//! Defaults for the well-known backends.
//!
//! Registering a record with one of these ids through
//! [`BackendRecord::known`](crate::BackendRecord::known) picks up its trust
//! flags, header profile and share-link hosts. Capabilities are never part of
//! the catalog; they come from whoever implements the backend.

use crate::headers::UserAgent;

/// Static defaults for one well-known backend.
#[derive(Debug, Clone, Copy)]
pub struct KnownBackend {
    pub id: &'static str,
    pub description: &'static str,
    /// Excluded from the default search subset.
    pub low_trust: bool,
    /// Payload can be validated with a plain range request. Backends whose
    /// media needs a decrypt step after download are not.
    pub validatable: bool,
    pub user_agent: UserAgent,
    pub referer: Option<&'static str>,
    /// Substrings identifying this backend's share links.
    pub link_hosts: &'static [&'static str],
}

const fn known(id: &'static str, description: &'static str) -> KnownBackend {
    KnownBackend {
        id,
        description,
        low_trust: false,
        validatable: true,
        user_agent: UserAgent::Desktop,
        referer: None,
        link_hosts: &[],
    }
}

/// Catalog order doubles as share-link priority: when several hosts match a
/// link, the earlier entry wins (`5sing.kugou.com` belongs to fivesing).
pub static KNOWN_BACKENDS: [KnownBackend; 11] = [
    KnownBackend {
        link_hosts: &["163.com"],
        ..known("netease", "NetEase Cloud Music")
    },
    KnownBackend {
        referer: Some("http://y.qq.com"),
        link_hosts: &["qq.com"],
        ..known("qq", "QQ Music")
    },
    KnownBackend {
        low_trust: true,
        validatable: false,
        link_hosts: &["5sing"],
        ..known("fivesing", "5sing")
    },
    KnownBackend {
        link_hosts: &["kugou.com"],
        ..known("kugou", "Kugou Music")
    },
    KnownBackend {
        link_hosts: &["kuwo.cn"],
        ..known("kuwo", "Kuwo Music")
    },
    KnownBackend {
        user_agent: UserAgent::Mobile,
        referer: Some("http://music.migu.cn/"),
        link_hosts: &["migu.cn"],
        ..known("migu", "Migu Music")
    },
    KnownBackend {
        low_trust: true,
        referer: Some("https://www.bilibili.com/"),
        link_hosts: &["bilibili.com", "b23.tv"],
        ..known("bilibili", "Bilibili")
    },
    KnownBackend {
        validatable: false,
        link_hosts: &["douyin.com", "qishui"],
        ..known("soda", "Soda Music")
    },
    KnownBackend {
        low_trust: true,
        link_hosts: &["jamendo.com"],
        ..known("jamendo", "Jamendo (CC)")
    },
    KnownBackend {
        low_trust: true,
        ..known("joox", "JOOX")
    },
    known("qianqian", "Qianqian Music"),
];

/// Look up the catalog entry for a backend id.
pub fn lookup(id: &str) -> Option<&'static KnownBackend> {
    KNOWN_BACKENDS.iter().find(|b| b.id == id)
}

/// Share-link matching priority of a backend id, lower first. Ids outside
/// the catalog come after every well-known backend.
pub fn link_priority(id: &str) -> usize {
    KNOWN_BACKENDS
        .iter()
        .position(|b| b.id == id)
        .unwrap_or(KNOWN_BACKENDS.len())
}

/// Human-readable description of a backend id.
pub fn description(id: &str) -> &'static str {
    lookup(id).map_or("Unknown source", |b| b.description)
}

/// Kind of entity a share link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Track,
    Playlist,
}

/// Canonical web page for a track or playlist on a well-known backend.
pub fn original_link(source: &str, id: &str, kind: LinkKind) -> Option<String> {
    let link = match (source, kind) {
        ("netease", LinkKind::Playlist) => format!("https://music.163.com/#/playlist?id={id}"),
        ("netease", LinkKind::Track) => format!("https://music.163.com/#/song?id={id}"),
        ("qq", LinkKind::Playlist) => format!("https://y.qq.com/n/ryqq/playlist/{id}"),
        ("qq", LinkKind::Track) => format!("https://y.qq.com/n/ryqq/songDetail/{id}"),
        ("kugou", LinkKind::Playlist) => {
            format!("https://www.kugou.com/yy/special/single/{id}.html")
        }
        ("kugou", LinkKind::Track) => format!("https://www.kugou.com/song/#hash={id}"),
        ("kuwo", LinkKind::Playlist) => format!("http://www.kuwo.cn/playlist_detail/{id}"),
        ("kuwo", LinkKind::Track) => format!("http://www.kuwo.cn/play_detail/{id}"),
        ("migu", LinkKind::Track) => format!("https://music.migu.cn/v3/music/song/{id}"),
        ("bilibili", _) => format!("https://www.bilibili.com/video/{id}"),
        ("fivesing", _) if id.contains('/') => format!("http://5sing.kugou.com/{id}.html"),
        _ => return None,
    };
    Some(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        for (i, a) in KNOWN_BACKENDS.iter().enumerate() {
            assert!(KNOWN_BACKENDS[i + 1..].iter().all(|b| b.id != a.id));
        }
    }

    #[test]
    fn test_flags() {
        assert!(lookup("bilibili").is_some_and(|b| b.low_trust));
        assert!(lookup("soda").is_some_and(|b| !b.validatable && !b.low_trust));
        assert!(lookup("fivesing").is_some_and(|b| !b.validatable && b.low_trust));
        assert!(lookup("netease").is_some_and(|b| b.validatable && !b.low_trust));
        assert!(lookup("nope").is_none());
    }

    #[test]
    fn test_link_priority() {
        assert!(link_priority("fivesing") < link_priority("kugou"));
        assert_eq!(link_priority("custom"), KNOWN_BACKENDS.len());
    }

    #[test]
    fn test_description() {
        assert_eq!(description("jamendo"), "Jamendo (CC)");
        assert_eq!(description("nope"), "Unknown source");
    }

    #[test]
    fn test_original_link() {
        assert_eq!(
            original_link("qq", "001", LinkKind::Track).as_deref(),
            Some("https://y.qq.com/n/ryqq/songDetail/001")
        );
        assert_eq!(original_link("migu", "1", LinkKind::Playlist), None);
        assert_eq!(original_link("fivesing", "123", LinkKind::Track), None);
        assert_eq!(
            original_link("fivesing", "yc/123", LinkKind::Track).as_deref(),
            Some("http://5sing.kugou.com/yc/123.html")
        );
    }
}
