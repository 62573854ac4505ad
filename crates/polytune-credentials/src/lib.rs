//! # polytune-credentials
//!
//! Thread-safe per-backend credential cache for Polytune.
//!
//! Credentials are opaque strings (usually cookie headers) keyed by backend
//! id. The whole map is persisted as a small JSON side-file. A missing or
//! malformed file never prevents startup: the store simply starts empty and
//! every backend is accessed anonymously.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use parking_lot::RwLock;
use polytune_core::{Error, Result};
use tracing::{debug, info, warn};

/// File name of the persisted credential map.
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Guarded backend id -> credential map with load/save persistence.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    credentials: RwLock<HashMap<String, String>>,
}

impl CredentialStore {
    /// Create an empty store persisted at `path`. Nothing is read from disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            credentials: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store at `path` and load it.
    ///
    /// A load failure is logged and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self::new(path);
        if let Err(e) = store.load() {
            warn!("Starting with empty credentials: {e}");
        }
        store
    }

    /// Resolve the default side-file location in the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "polytune", "Polytune").ok_or_else(|| {
            Error::Internal("Failed to determine data directory".to_string())
        })?;
        Ok(project_dirs.data_dir().join(CREDENTIALS_FILE))
    }

    /// Path of the persisted side-file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the credential for a backend, `None` for anonymous access.
    pub fn get(&self, backend: &str) -> Option<String> {
        self.credentials.read().get(backend).cloned()
    }

    /// Snapshot of every stored credential.
    pub fn all(&self) -> HashMap<String, String> {
        self.credentials.read().clone()
    }

    /// Bulk upsert. An empty value deletes the key.
    pub fn set_all<I, K, V>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut credentials = self.credentials.write();
        for (backend, value) in entries {
            let backend = backend.into();
            let value = value.into();
            if value.is_empty() {
                credentials.remove(&backend);
            } else {
                credentials.insert(backend, value);
            }
        }
    }

    /// Number of backends with a stored credential.
    pub fn len(&self) -> usize {
        self.credentials.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.read().is_empty()
    }

    /// Replace the in-memory map with the persisted one.
    ///
    /// A missing file is not an error. A malformed file leaves the store
    /// empty and reports `CredentialLoadFailed`.
    pub fn load(&self) -> Result<()> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No credential file at {}", self.path.display());
                self.credentials.write().clear();
                return Ok(());
            }
            Err(e) => {
                self.credentials.write().clear();
                return Err(Error::CredentialLoadFailed(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };

        let parsed: HashMap<String, String> = match serde_json::from_slice(&data) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.credentials.write().clear();
                return Err(Error::CredentialLoadFailed(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };

        let count = parsed.len();
        *self.credentials.write() = parsed;
        info!("Loaded {count} credential(s) from {}", self.path.display());
        Ok(())
    }

    /// Persist the whole map, creating the parent directory if needed.
    pub fn save(&self) -> Result<()> {
        let data = {
            let credentials = self.credentials.read();
            serde_json::to_vec_pretty(&*credentials)?
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, data)?;

        debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}
