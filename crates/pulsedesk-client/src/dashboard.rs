//! View orchestration over the API client and session store
//!
//! Ties the pieces together the way the views consume them: login persists a
//! session and arms the client's bearer token, data loads go through an
//! unauthorized-check that wipes the session on a 401/403, and the customer
//! summary feeds the fetched arrays through the derived-metrics layer.

use crate::api_client::{tag_tickets, ApiClient};
use crate::session::{PersistedSession, SessionStore};
use chrono::{DateTime, Utc};
use pulsedesk_core::{Customer, Result, Ticket, User};
use pulsedesk_metrics::{
    bucket_tickets, classify_detail, recent_activity, satisfaction_score, ActivityItem,
    HealthLevel, SatisfactionSummary, TicketBuckets,
};
use serde::Serialize;
use tracing::{info, instrument};

/// Everything the customer-detail view renders from
#[derive(Debug, Clone)]
pub struct CustomerDetail {
    /// The customer record
    pub customer: Customer,

    /// All tickets, tagged by tracker at fetch time
    pub tickets: Vec<Ticket>,

    /// Backend-precomputed Jira metrics, passed through untyped
    pub jira_metrics: serde_json::Value,
}

/// Bucket counts for the summary cards
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TicketCounts {
    /// Jira tickets opened in the last 30 days and still open
    pub jira_open_30d: usize,
    /// Jira tickets opened in the last 30 days and closed
    pub jira_closed_30d: usize,
    /// Jira tickets older than 90 days and still open
    pub jira_stale_open: usize,
    /// Jira tickets in development
    pub jira_in_development: usize,
    /// Critical Jira tickets
    pub jira_critical: usize,
    /// Zendesk tickets opened in the last 30 days and still open
    pub zendesk_open_30d: usize,
    /// Zendesk tickets opened in the last 30 days and closed
    pub zendesk_closed_30d: usize,
    /// Zendesk tickets older than 90 days and still open
    pub zendesk_stale_open: usize,
    /// Critical Zendesk tickets
    pub zendesk_critical: usize,
}

impl From<&TicketBuckets<'_>> for TicketCounts {
    fn from(buckets: &TicketBuckets<'_>) -> Self {
        Self {
            jira_open_30d: buckets.jira.open_last_30_days.len(),
            jira_closed_30d: buckets.jira.closed_last_30_days.len(),
            jira_stale_open: buckets.jira.stale_open.len(),
            jira_in_development: buckets.jira.in_development.len(),
            jira_critical: buckets.jira.critical.len(),
            zendesk_open_30d: buckets.zendesk.open_last_30_days.len(),
            zendesk_closed_30d: buckets.zendesk.closed_last_30_days.len(),
            zendesk_stale_open: buckets.zendesk.stale_open.len(),
            zendesk_critical: buckets.zendesk.critical.len(),
        }
    }
}

/// Derived summary for one customer, as printed by the CLI and rendered by
/// the detail view's cards
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    /// Customer id
    pub customer_id: String,

    /// Customer display name
    pub name: String,

    /// Raw health score
    pub health_score: f64,

    /// Detail-view health classification of the score
    pub health: HealthLevel,

    /// Summary-card bucket counts
    pub tickets: TicketCounts,

    /// Recent-activity feed
    pub activity: Vec<ActivityItem>,

    /// Satisfaction summary; absent when no ticket carries a rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction: Option<SatisfactionSummary>,
}

/// The dashboard facade: API client plus session store
#[derive(Debug)]
pub struct Dashboard<S> {
    client: ApiClient,
    sessions: S,
}

impl<S: SessionStore> Dashboard<S> {
    /// Build a dashboard, arming the client with any persisted token
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub fn new(mut client: ApiClient, sessions: S) -> Result<Self> {
        if let Some(session) = sessions.load()? {
            client.set_token(session.effective_token());
        }
        Ok(Self { client, sessions })
    }

    /// The underlying API client
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The underlying session store
    pub const fn sessions(&self) -> &S {
        &self.sessions
    }

    pub(crate) fn set_client_token(&mut self, token: &str) {
        self.client.set_token(token);
    }

    /// Map an unauthorized response to a wiped session.
    ///
    /// After this, no further authenticated call succeeds until re-login,
    /// because the bearer token is gone too.
    pub(crate) fn checked<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                info!("Backend rejected the session, clearing local state");
                let _ = self.sessions.clear();
                self.client.clear_token();
            }
        }
        result
    }

    /// Log in and persist the resulting session
    ///
    /// # Errors
    ///
    /// Returns [`pulsedesk_core::Error::Unauthorized`] on bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let session = self.client.login(email, password).await?;
        self.sessions
            .save(&PersistedSession::new(&session.token, session.user.clone()))?;
        self.client.set_token(&session.token);
        info!(user = %session.user.email, "Logged in");
        Ok(session.user)
    }

    /// Whether a session is loaded into the client
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.client.has_token()
    }

    /// Fetch the user record behind the current session
    ///
    /// # Errors
    ///
    /// A 401/403 clears the session before the error is returned.
    pub async fn me(&mut self) -> Result<User> {
        let result = self.client.me().await;
        self.checked(result)
    }

    /// Fetch the customer list
    ///
    /// # Errors
    ///
    /// A 401/403 clears the session before the error is returned.
    pub async fn customers(&mut self) -> Result<Vec<Customer>> {
        let result = self.client.list_customers().await;
        self.checked(result)
    }

    /// Load everything the customer-detail view needs
    ///
    /// # Errors
    ///
    /// A 401/403 clears the session before the error is returned.
    #[instrument(skip(self))]
    pub async fn customer_detail(&mut self, id: &str, refresh: bool) -> Result<CustomerDetail> {
        let customer = {
            let result = self.client.get_customer(id, refresh).await;
            self.checked(result)?
        };
        let jira = {
            let result = self.client.jira_tickets(id).await;
            self.checked(result)?
        };
        let zendesk = {
            let result = self.client.zendesk_tickets(id).await;
            self.checked(result)?
        };
        let jira_metrics = {
            let result = self.client.jira_metrics(id).await;
            self.checked(result)?
        };

        Ok(CustomerDetail {
            customer,
            tickets: tag_tickets(jira, zendesk),
            jira_metrics,
        })
    }

    /// Fetch one customer and derive the full summary as of `now`
    ///
    /// # Errors
    ///
    /// A 401/403 clears the session before the error is returned.
    pub async fn customer_summary(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<CustomerSummary> {
        let customer = {
            let result = self.client.get_customer(id, false).await;
            self.checked(result)?
        };
        let jira = {
            let result = self.client.jira_tickets(id).await;
            self.checked(result)?
        };
        let zendesk = {
            let result = self.client.zendesk_tickets(id).await;
            self.checked(result)?
        };

        let buckets = bucket_tickets(&jira, &zendesk, now);
        let counts = TicketCounts::from(&buckets);
        let tagged = tag_tickets(jira.clone(), zendesk.clone());

        Ok(CustomerSummary {
            customer_id: customer.id.clone(),
            name: customer.name.clone(),
            health_score: customer.health_score,
            health: classify_detail(customer.health_score),
            tickets: counts,
            activity: recent_activity(&tagged, now),
            satisfaction: satisfaction_score(&zendesk, now),
        })
    }

    /// Persist a ticket filter set for a customer
    ///
    /// # Errors
    ///
    /// Returns a session error when nobody is logged in or the store fails.
    pub fn save_filter(
        &mut self,
        customer_id: &str,
        filter: pulsedesk_metrics::TicketFilter,
    ) -> Result<()> {
        let Some(mut session) = self.sessions.load()? else {
            return Err(pulsedesk_core::Error::Session(
                "No session to save filters into".to_string(),
            ));
        };
        session
            .saved_filters
            .insert(customer_id.to_string(), filter);
        self.sessions.save(&session)
    }
}
