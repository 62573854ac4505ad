//! Per-backend outbound request shaping.
//!
//! Media hosts behind several backends reject requests that do not look like
//! they came from the backend's own player. Each backend carries a
//! [`HeaderProfile`] that decides the user agent and referrer, and its stored
//! credential is attached as a cookie.

use reqwest::header::{HeaderMap, HeaderValue, COOKIE, RANGE, REFERER, USER_AGENT};
use reqwest::RequestBuilder;
use tracing::warn;

/// Desktop browser user agent used unless a backend asks otherwise.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

/// Mobile browser user agent for hosts that only serve mobile clients.
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 9_1 like Mac OS X) AppleWebKit/601.1.46 (KHTML, like Gecko) Version/9.0 Mobile/13B143 Safari/601.1";

/// Which forged user agent a backend's media host expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserAgent {
    #[default]
    Desktop,
    Mobile,
}

impl UserAgent {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => DESKTOP_USER_AGENT,
            Self::Mobile => MOBILE_USER_AGENT,
        }
    }
}

/// User agent and referrer overrides for one backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderProfile {
    pub user_agent: UserAgent,
    pub referer: Option<String>,
}

impl HeaderProfile {
    /// Desktop user agent, no referrer.
    pub fn desktop() -> Self {
        Self::default()
    }

    /// Mobile user agent, no referrer.
    pub fn mobile() -> Self {
        Self {
            user_agent: UserAgent::Mobile,
            referer: None,
        }
    }

    #[must_use]
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Build the headers for a request to this backend's media host.
    ///
    /// A credential or referrer that is not a valid header value is dropped
    /// with a warning rather than failing the request.
    pub fn header_map(&self, credential: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent.as_str()));

        if let Some(referer) = &self.referer {
            match HeaderValue::from_str(referer) {
                Ok(value) => {
                    headers.insert(REFERER, value);
                }
                Err(e) => warn!("Dropping invalid referer {referer:?}: {e}"),
            }
        }

        if let Some(cookie) = credential.filter(|c| !c.is_empty()) {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    headers.insert(COOKIE, value);
                }
                Err(e) => warn!("Dropping credential that is not a valid cookie header: {e}"),
            }
        }

        headers
    }

    /// Decorate a request with this profile, the credential and an optional
    /// byte range (e.g. `"bytes=0-1"`).
    pub fn apply(
        &self,
        request: RequestBuilder,
        credential: Option<&str>,
        range: Option<&str>,
    ) -> RequestBuilder {
        let request = request.headers(self.header_map(credential));
        match range {
            Some(range) => request.header(RANGE, range),
            None => request,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_default() {
        let headers = HeaderProfile::desktop().header_map(None);
        assert_eq!(headers.get(USER_AGENT).unwrap(), DESKTOP_USER_AGENT);
        assert!(headers.get(REFERER).is_none());
        assert!(headers.get(COOKIE).is_none());
    }

    #[test]
    fn test_mobile_with_referer_and_cookie() {
        let profile = HeaderProfile::mobile().with_referer("http://music.migu.cn/");
        let headers = profile.header_map(Some("sid=1"));
        assert_eq!(headers.get(USER_AGENT).unwrap(), MOBILE_USER_AGENT);
        assert_eq!(headers.get(REFERER).unwrap(), "http://music.migu.cn/");
        assert_eq!(headers.get(COOKIE).unwrap(), "sid=1");
    }

    #[test]
    fn test_empty_or_invalid_credential_is_dropped() {
        let profile = HeaderProfile::desktop();
        assert!(profile.header_map(Some("")).get(COOKIE).is_none());
        assert!(profile.header_map(Some("bad\nvalue")).get(COOKIE).is_none());
    }

    #[test]
    fn test_apply_sets_range() {
        let client = reqwest::Client::new();
        let request = HeaderProfile::desktop()
            .apply(client.get("http://localhost/a.mp3"), None, Some("bytes=0-1"))
            .build()
            .unwrap();
        assert_eq!(request.headers().get(RANGE).unwrap(), "bytes=0-1");
        assert_eq!(request.headers().get(USER_AGENT).unwrap(), DESKTOP_USER_AGENT);
    }
}
