//! Persisted credential storage

use log::{debug, warn};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::Session;
use crate::error::Result;

/// Where the session survives between runs.
///
/// This is the desktop counterpart of browser storage: the adapter reads the
/// token from here and clears it when the server rejects it.
pub trait CredentialStore: Send + Sync {
    /// Load the stored session, if any
    fn load(&self) -> Result<Option<Session>>;

    /// Persist a session, replacing any previous one
    fn save(&self, session: &Session) -> Result<()>;

    /// Forget the stored session
    fn clear(&self) -> Result<()>;
}

/// Keeps the session in memory only
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    session: Mutex<Option<Session>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `session`
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Session>> {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(session.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut current = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut current = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        *current = None;
        Ok(())
    }
}

/// Keeps the session in a JSON file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Session>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                // An unreadable file is as good as no session.
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), err);
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(session)?;
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(&json)?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Session file {} removed", self.path.display());
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("opaque-token".to_string(), "bearer".to_string(), None)
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap().map(|s| s.access_token), Some("opaque-token".to_string()));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileCredentialStore::new(&path);

        assert!(store.load().unwrap().is_none());
        store.save(&session()).unwrap();
        assert!(path.exists());

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(session()));

        reopened.clear().unwrap();
        assert!(!path.exists());
        // Clearing twice is fine.
        reopened.clear().unwrap();
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(store.load().unwrap().is_none());
    }
}
