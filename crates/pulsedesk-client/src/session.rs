//! Persisted session storage
//!
//! The session is an explicit object injected into the components that need
//! it, behind a small store trait, rather than ambient reads of a browser
//! storage bag. A malformed persisted session wipes the store and reads back
//! as "not logged in" instead of failing.

use pulsedesk_core::{Error, ImpersonationSession, Result, User};
use pulsedesk_metrics::TicketFilter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Everything the client persists between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    /// JWT bearer token
    pub token: String,

    /// Authenticated user record
    pub user: User,

    /// Active impersonation session, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonation: Option<ImpersonationSession>,

    /// Saved ticket filter sets, keyed by customer id
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub saved_filters: HashMap<String, TicketFilter>,
}

impl PersistedSession {
    /// Create a fresh session with no impersonation or saved filters
    #[must_use]
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
            impersonation: None,
            saved_filters: HashMap::new(),
        }
    }

    /// Token to authenticate requests with: the impersonation token while a
    /// session is active, the user's own token otherwise
    #[must_use]
    pub fn effective_token(&self) -> &str {
        self.impersonation
            .as_ref()
            .map_or(&self.token, |imp| &imp.token)
    }
}

/// Storage for the persisted session
pub trait SessionStore: Send + Sync {
    /// Load the persisted session, if one exists and parses
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures; a malformed session is
    /// wiped and reported as `None`.
    fn load(&self) -> Result<Option<PersistedSession>>;

    /// Persist the session
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    fn save(&self, session: &PersistedSession) -> Result<()>;

    /// Destroy the persisted session
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be cleared.
    fn clear(&self) -> Result<()>;
}

/// Session store backed by a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store writing to the given path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Session(format!("Failed to read session: {e}"))),
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // Malformed persisted state wipes storage and forces a re-login
                warn!("Discarding malformed persisted session: {e}");
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Session(format!("Failed to create session dir: {e}")))?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)
            .map_err(|e| Error::Session(format!("Failed to write session: {e}")))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Session(format!("Failed to clear session: {e}"))),
        }
    }
}

/// In-memory session store, used in tests and ephemeral contexts
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<PersistedSession>>,
}

impl MemorySessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| Error::Session("Session store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| Error::Session("Session store lock poisoned".to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| Error::Session("Session store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
