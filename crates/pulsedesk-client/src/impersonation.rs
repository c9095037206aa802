//! Impersonation workflow
//!
//! Impersonation sessions are transient: the token and metadata live only in
//! the persisted session while active and are destroyed when stopped. The
//! client switches to the impersonation token for the duration and back to
//! the user's own token afterwards.

use crate::api_client::StartImpersonationRequest;
use crate::dashboard::Dashboard;
use crate::session::SessionStore;
use pulsedesk_core::{
    Error, ImpersonationSession, ImpersonationTarget, Result,
};
use tracing::{info, instrument};

impl<S: SessionStore> Dashboard<S> {
    /// Begin impersonating a customer or user
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] when the logged-in user lacks the
    /// impersonation permission (the local session survives), or a session
    /// error when nobody is logged in. A 401/403 from the backend clears the
    /// session before the error is returned.
    #[instrument(skip(self))]
    pub async fn start_impersonation(
        &mut self,
        target: ImpersonationTarget,
        reason: &str,
        duration_minutes: i64,
    ) -> Result<ImpersonationSession> {
        let Some(mut session) = self.sessions().load()? else {
            return Err(Error::Session(
                "Cannot impersonate without a session".to_string(),
            ));
        };
        if !session.user.can_impersonate {
            return Err(Error::Unauthorized);
        }

        let request = StartImpersonationRequest {
            target,
            reason: reason.to_string(),
            duration_minutes,
        };
        let impersonation = {
            let result = self.client().start_impersonation(&request).await;
            self.checked(result)?
        };

        session.impersonation = Some(impersonation.clone());
        self.sessions().save(&session)?;
        self.set_client_token(&impersonation.token);

        info!(target = ?impersonation.target, "Impersonation started");
        Ok(impersonation)
    }

    /// End the active impersonation session, if any
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call or the session store fails.
    /// A 401/403 from the backend clears the session before the error is
    /// returned.
    #[instrument(skip(self))]
    pub async fn stop_impersonation(&mut self) -> Result<()> {
        let Some(mut session) = self.sessions().load()? else {
            return Ok(());
        };
        if session.impersonation.is_none() {
            return Ok(());
        }

        {
            let result = self.client().stop_impersonation().await;
            self.checked(result)?;
        }

        session.impersonation = None;
        self.sessions().save(&session)?;
        self.set_client_token(&session.token);

        info!("Impersonation stopped");
        Ok(())
    }
}
