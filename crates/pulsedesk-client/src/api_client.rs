//! HTTP client for the Pulsedesk REST backend
//!
//! Thin typed wrapper over the backend surface: customers, tickets, auth,
//! impersonation, reporting, and QBR endpoints. Every request carries the
//! bearer token when one is set; 401/403 responses map to
//! [`Error::Unauthorized`], which callers treat as the signal to clear the
//! persisted session.

use chrono::{DateTime, Utc};
use pulsedesk_core::{
    Customer, Error, ImpersonationSession, ImpersonationTarget, JiraTicket, Result, Session,
    Ticket, User, ZendeskTicket,
};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Login request body for `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Request body for `POST /api/impersonation/start`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartImpersonationRequest {
    /// Customer or user to impersonate
    pub target: ImpersonationTarget,
    /// Stated reason, recorded by the backend audit trail
    pub reason: String,
    /// Requested session length in minutes
    pub duration_minutes: i64,
}

/// A report template as served by `GET /api/reports/templates`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTemplate {
    /// Template id
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for `POST /api/reports/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    /// Template to render
    pub template_id: String,
    /// Customers to include
    pub customer_ids: Vec<String>,
}

/// A generated report descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    /// Report id
    pub id: String,
    /// Download URL, once rendering finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Backend-reported status
    #[serde(default)]
    pub status: String,
}

/// Request body for `POST /api/qbr/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQbrRequest {
    /// Customer to summarize
    pub customer_id: String,
    /// Quarter number, 1-4
    pub quarter: u8,
    /// Calendar year
    pub year: i32,
}

/// A quarterly business review record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QbrRecord {
    /// QBR id
    pub id: String,
    /// Customer the review covers
    pub customer_id: String,
    /// Quarter number, 1-4
    pub quarter: u8,
    /// Calendar year
    pub year: i32,
    /// Backend-reported status
    #[serde(default)]
    pub status: String,
    /// Link to the generated document, when ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the record was generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// API client for making HTTP requests to the Pulsedesk backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Set the bearer token used for subsequent requests
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replace the bearer token in place
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the bearer token
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Whether a bearer token is currently set
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        let mut request = self.client.get(self.url(path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request to {path} failed: {e}")))?;
        Self::handle(response, path).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!(path, "POST");
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request to {path} failed: {e}")))?;
        Self::handle(response, path).await
    }

    async fn handle<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Unauthorized),
            StatusCode::NOT_FOUND => Err(Error::NotFound {
                resource: path.to_string(),
            }),
            s if !s.is_success() => {
                let message = response.text().await.unwrap_or_else(|_| s.to_string());
                Err(Error::Api {
                    status: s.as_u16(),
                    message,
                })
            }
            _ => response
                .json()
                .await
                .map_err(|e| Error::Http(format!("Failed to parse response from {path}: {e}"))),
        }
    }

    /// Authenticate and obtain a session
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] on bad credentials, or a transport
    /// error when the backend is unreachable.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        self.post(
            "/api/auth/login",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// Fetch the user record behind the current bearer token
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] when the token is no longer valid.
    pub async fn me(&self) -> Result<User> {
        self.get("/api/auth/me").await
    }

    /// List all customers visible to the current user
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be
    /// parsed.
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.get("/api/customers").await
    }

    /// Fetch one customer, optionally asking the backend to refresh its
    /// integration snapshot first
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub async fn get_customer(&self, id: &str, refresh: bool) -> Result<Customer> {
        let encoded = urlencoding::encode(id);
        let path = if refresh {
            format!("/api/customers/{encoded}?refresh=true")
        } else {
            format!("/api/customers/{encoded}")
        };
        self.get(&path).await
    }

    /// Fetch the customer's Jira tickets
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be
    /// parsed.
    pub async fn jira_tickets(&self, customer_id: &str) -> Result<Vec<JiraTicket>> {
        let encoded = urlencoding::encode(customer_id);
        self.get(&format!("/api/customers/{encoded}/jira-tickets"))
            .await
    }

    /// Fetch the backend's precomputed Jira metrics for a customer
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    pub async fn jira_metrics(&self, customer_id: &str) -> Result<serde_json::Value> {
        let encoded = urlencoding::encode(customer_id);
        self.get(&format!("/api/customers/{encoded}/jira-metrics"))
            .await
    }

    /// Fetch the customer's Zendesk tickets
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be
    /// parsed.
    pub async fn zendesk_tickets(&self, customer_id: &str) -> Result<Vec<ZendeskTicket>> {
        let encoded = urlencoding::encode(customer_id);
        self.get(&format!("/api/customers/{encoded}/tickets")).await
    }

    /// Begin an impersonation session
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] when the caller lacks the
    /// impersonation permission.
    pub async fn start_impersonation(
        &self,
        request: &StartImpersonationRequest,
    ) -> Result<ImpersonationSession> {
        self.post("/api/impersonation/start", request).await
    }

    /// End the active impersonation session
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    pub async fn stop_impersonation(&self) -> Result<()> {
        let _: serde_json::Value = self
            .post("/api/impersonation/stop", &serde_json::json!({}))
            .await?;
        Ok(())
    }

    /// List available report templates
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be
    /// parsed.
    pub async fn report_templates(&self) -> Result<Vec<ReportTemplate>> {
        self.get("/api/reports/templates").await
    }

    /// Generate a report from a template
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    pub async fn generate_report(
        &self,
        request: &GenerateReportRequest,
    ) -> Result<GeneratedReport> {
        self.post("/api/reports/generate", request).await
    }

    /// Fetch QBR history for a customer
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be
    /// parsed.
    pub async fn qbr_history(&self, customer_id: &str) -> Result<Vec<QbrRecord>> {
        let encoded = urlencoding::encode(customer_id);
        self.get(&format!("/api/qbr/customer/{encoded}")).await
    }

    /// Generate a QBR for a customer and quarter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    pub async fn generate_qbr(&self, request: &GenerateQbrRequest) -> Result<QbrRecord> {
        self.post("/api/qbr/generate", request).await
    }
}

/// Tag raw tracker feeds into the unified ticket union.
///
/// This is the single place the Jira/Zendesk distinction is established;
/// downstream code matches on [`Ticket::kind`] instead of probing shapes.
#[must_use]
pub fn tag_tickets(jira: Vec<JiraTicket>, zendesk: Vec<ZendeskTicket>) -> Vec<Ticket> {
    jira.into_iter()
        .map(Ticket::Jira)
        .chain(zendesk.into_iter().map(Ticket::Zendesk))
        .collect()
}
