//! Session lifecycle
//!
//! The [`SessionContext`] is handed to the HTTP adapter when the client is
//! built. It owns the credential store, knows the current token, and tells
//! the hosting application about sign-in, sign-out and expiry through
//! [`SessionEvent`]s. Navigation on expiry is the host's business.

mod store;

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::users::LoginUser;

pub use store::*;

const EVENT_CAPACITY: usize = 16;

/// Session data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The access token
    pub access_token: String,

    /// The token type
    pub token_type: String,

    /// The user returned at login
    #[serde(default)]
    pub user: Option<LoginUser>,

    /// Expiry as a unix timestamp, when the token says so
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Session {
    /// Create a new session, reading the expiry from the token when it is a
    /// JWT
    pub fn new(access_token: String, token_type: String, user: Option<LoginUser>) -> Self {
        let expires_at = token_expiry(&access_token);
        Self {
            access_token,
            token_type,
            user,
            expires_at,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

#[derive(Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without checking its signature.
///
/// The client cannot verify the token; it only wants to avoid sending one
/// it already knows is dead.
pub fn token_expiry(token: &str) -> Option<i64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .and_then(|data| data.claims.exp)
}

/// Session lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login succeeded and the session was persisted
    SignedIn,
    /// The user logged out
    SignedOut,
    /// The server rejected the token; credentials were cleared and the host
    /// should send the user back to the login surface
    Expired,
}

struct Inner {
    store: Arc<dyn CredentialStore>,
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

/// Shared session state.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl SessionContext {
    /// Create a context over `store`. Call [`SessionContext::init`] to pick
    /// up a session persisted by an earlier run.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                store,
                current: RwLock::new(None),
                events,
            }),
        }
    }

    /// A context backed by memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    /// Load a persisted session from the store. Expired sessions are
    /// cleared instead of loaded.
    pub fn init(&self) -> Result<Option<Session>> {
        let stored = self.inner.store.load()?;
        let session = match stored {
            Some(session) if session.is_expired() => {
                info!("Stored session has expired, clearing it");
                self.inner.store.clear()?;
                None
            }
            other => other,
        };

        debug!("Session initialised (present: {})", session.is_some());
        self.set_current(session.clone());
        Ok(session)
    }

    /// The current session
    pub fn current(&self) -> Option<Session> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The bearer token to send, if any
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Persist a freshly issued session
    pub fn begin(&self, session: Session) -> Result<()> {
        self.inner.store.save(&session)?;
        self.set_current(Some(session));
        info!("Session started");
        self.emit(SessionEvent::SignedIn);
        Ok(())
    }

    /// Tear the session down on logout
    pub fn end(&self) -> Result<()> {
        self.set_current(None);
        self.inner.store.clear()?;
        info!("Session ended");
        self.emit(SessionEvent::SignedOut);
        Ok(())
    }

    /// Replace the user record of the current session and persist it.
    /// Does nothing when signed out.
    pub fn refresh_user(&self, user: LoginUser) -> Result<()> {
        let updated = {
            let mut current = self
                .inner
                .current
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            match current.as_mut() {
                Some(session) => {
                    session.user = Some(user);
                    session.clone()
                }
                None => return Ok(()),
            }
        };
        self.inner.store.save(&updated)?;
        debug!("Stored session user refreshed");
        Ok(())
    }

    /// The server rejected the token: clear credentials and tell the host
    pub fn expire(&self) {
        self.discard();
        warn!("Session expired");
        self.emit(SessionEvent::Expired);
    }

    /// Clear credentials without announcing anything
    pub(crate) fn discard(&self) {
        self.set_current(None);
        if let Err(err) = self.inner.store.clear() {
            warn!("Failed to clear stored credentials: {}", err);
        }
    }

    /// Listen for session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    fn set_current(&self, session: Option<Session>) {
        let mut current = self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = session;
    }

    fn emit(&self, event: SessionEvent) {
        if self.inner.events.send(event.clone()).is_err() {
            debug!("No listeners for session event {:?}", event);
        }
    }
}
