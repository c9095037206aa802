//! Session guard and role-based landing
//!
//! Decides whether a view may render. An expired or malformed token, or a
//! missing session, clears storage and yields the login redirect; otherwise
//! the user's role picks one of three landing views.

use crate::session::{PersistedSession, SessionStore};
use crate::token;
use chrono::{DateTime, Utc};
use pulsedesk_core::{Result, Role};
use tracing::{debug, info};

/// Role-based landing view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Internal admin dashboard
    Admin,
    /// External client dashboard
    Client,
    /// General user dashboard
    General,
}

impl From<Role> for Landing {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Client => Self::Client,
            Role::User => Self::General,
        }
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    /// Session is valid; render this landing with this session
    Landing(Landing, Box<PersistedSession>),
    /// No valid session; redirect to the login view
    Login,
}

/// Route guard over a session store
#[derive(Debug)]
pub struct SessionGuard<S> {
    store: S,
}

impl<S: SessionStore> SessionGuard<S> {
    /// Create a guard over the given store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Check the persisted session as of `now`
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures; invalid sessions are
    /// cleared and reported as [`RouteOutcome::Login`].
    pub fn check(&self, now: DateTime<Utc>) -> Result<RouteOutcome> {
        let Some(mut session) = self.store.load()? else {
            debug!("No persisted session, redirecting to login");
            return Ok(RouteOutcome::Login);
        };

        match token::is_expired(&session.token, now) {
            Ok(false) => {}
            Ok(true) => {
                info!("Session token expired, clearing session");
                self.store.clear()?;
                return Ok(RouteOutcome::Login);
            }
            Err(e) => {
                info!("Malformed session token ({e}), clearing session");
                self.store.clear()?;
                return Ok(RouteOutcome::Login);
            }
        }

        // An outlived impersonation session is dropped silently; the user's
        // own session stays valid.
        if session
            .impersonation
            .as_ref()
            .is_some_and(|imp| imp.is_expired(now))
        {
            session.impersonation = None;
            self.store.save(&session)?;
        }

        let landing = Landing::from(session.user.role);
        Ok(RouteOutcome::Landing(landing, Box::new(session)))
    }
}
