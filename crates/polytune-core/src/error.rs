//! Error types for Polytune.

use thiserror::Error;

use crate::types::common::Capability;

/// Result type alias using Polytune's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Polytune.
#[derive(Error, Debug)]
pub enum Error {
    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    // Backend dispatch errors
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Backend {backend} does not support {capability}")]
    BackendUnsupported {
        backend: String,
        capability: Capability,
    },

    #[error("Backend {backend} failed: {message}")]
    BackendCallFailed { backend: String, message: String },

    // Aggregate outcomes
    #[error("No results from any backend")]
    NoResults,

    #[error("No playable match found")]
    NoPlayableMatch,

    // Link parsing
    #[error("Unrecognized link: {0}")]
    UnknownLink(String),

    #[error("Failed to parse {backend} link: {message}")]
    LinkParse { backend: String, message: String },

    // Credential persistence
    #[error("Failed to load credentials: {0}")]
    CredentialLoadFailed(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// HTTP-specific errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Wrap a failure reported by a single backend.
    pub fn backend(backend: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::BackendCallFailed {
            backend: backend.into(),
            message: err.to_string(),
        }
    }

    /// Returns true if this is an ordinary per-backend failure. Aggregate
    /// outcomes and caller mistakes are not.
    pub const fn is_skippable(&self) -> bool {
        !matches!(
            self,
            Self::NoResults | Self::NoPlayableMatch | Self::InvalidArgument(_)
        )
    }

    /// Returns true if the backend simply lacks the requested capability.
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::BackendUnsupported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_skippable() {
        assert!(Error::backend("qq", "boom").is_skippable());
        assert!(Error::BackendUnsupported {
            backend: "joox".into(),
            capability: Capability::Lyrics,
        }
        .is_skippable());
        assert!(!Error::NoPlayableMatch.is_skippable());
        assert!(!Error::NoResults.is_skippable());
        assert!(Error::Http(HttpError::Timeout).is_skippable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::BackendUnsupported {
            backend: "kuwo".into(),
            capability: Capability::PlaylistSearch,
        };
        assert_eq!(err.to_string(), "Backend kuwo does not support playlist search");
        assert_ne!(
            Error::NoResults.to_string(),
            Error::NoPlayableMatch.to_string()
        );
    }
}
