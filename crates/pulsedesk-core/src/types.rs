//! Core data types for the Pulsedesk dashboard
//!
//! Everything here is a transient copy of backend-owned state. The client
//! never creates or mutates these entities beyond ordinary view-state
//! assignment; identity and persistence live on the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer identifier type
pub type CustomerId = String;

/// User identifier type
pub type UserId = String;

/// Role assigned to a dashboard user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Internal administrator with access to the admin view
    Admin,
    /// External client user scoped to one customer
    Client,
    /// Internal general user
    User,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Client => write!(f, "client"),
            Self::User => write!(f, "user"),
        }
    }
}

/// A product-usage record attached to a customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductUsage {
    /// Product type name
    #[serde(rename = "type")]
    pub product_type: String,

    /// Customer-specific name for the product, when one was set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

/// Summary counts from the customer's connected integrations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSnapshot {
    /// Number of Jira tickets known to the backend
    #[serde(default)]
    pub jira_tickets: i64,

    /// Number of Zendesk tickets known to the backend
    #[serde(default)]
    pub zendesk_tickets: i64,

    /// Number of HubSpot contacts known to the backend
    #[serde(default)]
    pub hubspot_contacts: i64,
}

/// A customer record as served by `GET /api/customers`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,

    /// Display name
    pub name: String,

    /// Health score on a 0-10 scale (0-100 on the admin view). Read with a
    /// default of 0 when the backend omits it; no range validation is done
    /// beyond display bucketing.
    #[serde(default)]
    pub health_score: f64,

    /// Annual recurring revenue
    #[serde(default)]
    pub arr: f64,

    /// Tool names associated with the account
    #[serde(default)]
    pub tools: Vec<String>,

    /// Product usage records
    #[serde(default)]
    pub products: Vec<ProductUsage>,

    /// Integration summary counts, when the backend has synced them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrations: Option<IntegrationSnapshot>,

    /// Renewal-likelihood label supplied by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_likelihood: Option<String>,
}

/// Satisfaction rating attached to a Zendesk ticket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SatisfactionRating {
    /// Rating score on a 0-5 scale
    #[serde(default)]
    pub score: Option<f64>,

    /// When the rating was recorded
    #[serde(default, with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A Jira engineering ticket for one customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JiraTicket {
    /// Issue key, e.g. `PROJ-123`
    pub key: String,

    /// Issue summary line
    #[serde(default)]
    pub summary: String,

    /// Workflow status, e.g. `Open`, `In Progress`, `Done`
    #[serde(default)]
    pub status: String,

    /// Priority label, e.g. `Highest`, `Critical`, `Medium`
    #[serde(default)]
    pub priority: String,

    /// Creation timestamp. `None` when the feed carried a missing or
    /// unparsable date, which excludes the ticket from every time-bounded
    /// bucket.
    #[serde(default, with = "lenient_datetime")]
    pub created: Option<DateTime<Utc>>,

    /// Last-update timestamp
    #[serde(default, with = "lenient_datetime")]
    pub updated: Option<DateTime<Utc>>,

    /// Assignee display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Link to the issue in Jira
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A Zendesk support ticket for one customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZendeskTicket {
    /// Numeric ticket id
    pub id: i64,

    /// Ticket subject line
    #[serde(default)]
    pub subject: String,

    /// Ticket status, e.g. `open`, `pending`, `solved`
    #[serde(default)]
    pub status: String,

    /// Priority label, e.g. `urgent`, `high`, `normal`, `low`
    #[serde(default)]
    pub priority: String,

    /// Creation timestamp, lenient like [`JiraTicket::created`]
    #[serde(default, with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last-update timestamp
    #[serde(default, with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Satisfaction rating, when the requester left one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_rating: Option<SatisfactionRating>,

    /// Assignee agent id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,

    /// Link to the ticket in Zendesk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Tracker a ticket originates from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TicketKind {
    /// Jira engineering tracker
    Jira,
    /// Zendesk support tracker
    Zendesk,
}

impl std::fmt::Display for TicketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jira => write!(f, "jira"),
            Self::Zendesk => write!(f, "zendesk"),
        }
    }
}

/// A support ticket from either tracker.
///
/// The variant is established once at fetch time, so downstream code matches
/// on the tag instead of probing for the presence of a `key` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Ticket {
    /// Jira variant
    Jira(JiraTicket),
    /// Zendesk variant
    Zendesk(ZendeskTicket),
}

impl Ticket {
    /// Tracker this ticket came from
    #[must_use]
    pub const fn kind(&self) -> TicketKind {
        match self {
            Self::Jira(_) => TicketKind::Jira,
            Self::Zendesk(_) => TicketKind::Zendesk,
        }
    }

    /// Stable display identifier: the Jira key or the Zendesk numeric id
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Jira(t) => t.key.clone(),
            Self::Zendesk(t) => t.id.to_string(),
        }
    }

    /// Summary or subject line
    #[must_use]
    pub fn summary(&self) -> &str {
        match self {
            Self::Jira(t) => &t.summary,
            Self::Zendesk(t) => &t.subject,
        }
    }

    /// Workflow status
    #[must_use]
    pub fn status(&self) -> &str {
        match self {
            Self::Jira(t) => &t.status,
            Self::Zendesk(t) => &t.status,
        }
    }

    /// Priority label
    #[must_use]
    pub fn priority(&self) -> &str {
        match self {
            Self::Jira(t) => &t.priority,
            Self::Zendesk(t) => &t.priority,
        }
    }

    /// Creation timestamp, when the feed carried a parsable one
    #[must_use]
    pub const fn created(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Jira(t) => t.created,
            Self::Zendesk(t) => t.created_at,
        }
    }

    /// Last-update timestamp
    #[must_use]
    pub const fn updated(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Jira(t) => t.updated,
            Self::Zendesk(t) => t.updated_at,
        }
    }

    /// Link into the tracker
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Jira(t) => t.url.as_deref(),
            Self::Zendesk(t) => t.url.as_deref(),
        }
    }
}

/// Reporting permissions bundle attached to a user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportingPermissions {
    /// Whether the user may generate reports on demand
    #[serde(default)]
    pub can_generate: bool,

    /// Whether the user may schedule recurring reports
    #[serde(default)]
    pub can_schedule: bool,

    /// Report template ids the user may use; empty means all
    #[serde(default)]
    pub allowed_templates: Vec<String>,

    /// Customer ids the user may report on; empty means all
    #[serde(default)]
    pub allowed_customers: Vec<CustomerId>,
}

/// Link from a user to a customer. The backend sometimes returns a bare id
/// and sometimes a populated customer object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    /// Bare customer id
    Id(CustomerId),
    /// Fully populated customer record
    Populated(Box<Customer>),
}

impl CustomerRef {
    /// Customer id regardless of population
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Populated(customer) => &customer.id,
        }
    }
}

/// A dashboard user as served by `GET /api/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Role deciding the landing view
    #[serde(default)]
    pub role: Role,

    /// Customer this user is scoped to, for client users
    #[serde(default, rename = "customerId", skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,

    /// Reporting permissions, when granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_permissions: Option<ReportingPermissions>,

    /// Whether the user may impersonate customers or other users
    #[serde(default)]
    pub can_impersonate: bool,
}

/// Authenticated session: the bearer token plus the user it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// JWT bearer token
    pub token: String,

    /// Authenticated user record
    pub user: User,
}

/// Target of an impersonation session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImpersonationTarget {
    /// Impersonate a whole customer account
    Customer {
        /// Customer id
        id: CustomerId,
        /// Customer display name
        name: String,
    },
    /// Impersonate a single user
    User {
        /// User id
        id: UserId,
        /// User display name
        name: String,
    },
}

/// A transient impersonation session. Held only in client storage while
/// active; destroyed when stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpersonationSession {
    /// Token scoped to the impersonated view
    pub token: String,

    /// Who is being impersonated
    pub target: ImpersonationTarget,

    /// Stated reason for the impersonation
    pub reason: String,

    /// When the session began
    pub started_at: DateTime<Utc>,

    /// How long the session is valid for, in minutes
    pub duration_minutes: i64,
}

impl ImpersonationSession {
    /// Whether the session has outlived its duration
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.started_at + chrono::Duration::minutes(self.duration_minutes)
    }
}

/// Lenient timestamp parsing for ticket feeds.
///
/// Jira and Zendesk exports disagree on timestamp formats and occasionally
/// ship garbage. An unparsable value becomes `None` rather than a
/// deserialization failure, which downstream bucketing treats as "excluded
/// from every time-bounded bucket".
pub mod lenient_datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parse a JSON value into a UTC timestamp, if possible
    #[must_use]
    pub fn parse_value(value: &serde_json::Value) -> Option<DateTime<Utc>> {
        match value {
            serde_json::Value::String(s) => parse_str(s),
            serde_json::Value::Number(n) => n.as_i64().and_then(from_epoch),
            _ => None,
        }
    }

    /// Parse a timestamp string in the formats the trackers actually emit
    #[must_use]
    pub fn parse_str(raw: &str) -> Option<DateTime<Utc>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(dt.with_timezone(&Utc));
        }
        // Jira emits offsets without a colon, e.g. 2024-01-15T10:30:00.000+0000
        if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.and_utc());
        }
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
        None
    }

    fn from_epoch(raw: i64) -> Option<DateTime<Utc>> {
        // Heuristic: values past the year 33658 in seconds are milliseconds
        if raw.abs() >= 1_000_000_000_000 {
            DateTime::from_timestamp_millis(raw)
        } else {
            DateTime::from_timestamp(raw, 0)
        }
    }

    /// Serde deserializer for optional lenient timestamps
    ///
    /// # Errors
    ///
    /// Never fails on bad timestamps; only on malformed JSON structure.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(parse_value))
    }

    /// Serde serializer emitting RFC 3339 or null
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::uninlined_format_args
)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_role_default_and_display() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!(format!("{}", Role::Admin), "admin");
        assert_eq!(format!("{}", Role::Client), "client");
        assert_eq!(format!("{}", Role::User), "user");
    }

    #[test]
    fn test_role_serialization() {
        let serialized = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(serialized, "\"admin\"");

        let deserialized: Role = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(deserialized, Role::Client);
    }

    #[test]
    fn test_customer_health_score_defaults_to_zero() {
        let customer: Customer = serde_json::from_value(json!({
            "id": "cus_1",
            "name": "Acme"
        }))
        .unwrap();

        assert_eq!(customer.health_score, 0.0);
        assert_eq!(customer.arr, 0.0);
        assert!(customer.tools.is_empty());
        assert!(customer.products.is_empty());
        assert!(customer.integrations.is_none());
    }

    #[test]
    fn test_customer_full_deserialization() {
        let customer: Customer = serde_json::from_value(json!({
            "id": "cus_2",
            "name": "Globex",
            "healthScore": 7.5,
            "arr": 120_000.0,
            "tools": ["jira", "zendesk"],
            "products": [
                {"type": "analytics", "customName": "Globex Insights"},
                {"type": "automation"}
            ],
            "integrations": {"jiraTickets": 12, "zendeskTickets": 4, "hubspotContacts": 33},
            "renewalLikelihood": "likely"
        }))
        .unwrap();

        assert_eq!(customer.health_score, 7.5);
        assert_eq!(customer.products.len(), 2);
        assert_eq!(
            customer.products[0].custom_name.as_deref(),
            Some("Globex Insights")
        );
        assert!(customer.products[1].custom_name.is_none());
        assert_eq!(customer.integrations.unwrap().jira_tickets, 12);
        assert_eq!(customer.renewal_likelihood.as_deref(), Some("likely"));
    }

    #[test]
    fn test_jira_ticket_lenient_created_date() {
        let ticket: JiraTicket = serde_json::from_value(json!({
            "key": "PROJ-1",
            "summary": "Crash on login",
            "status": "Open",
            "priority": "High",
            "created": "not a date",
            "updated": "2024-03-15T14:25:30Z"
        }))
        .unwrap();

        assert!(ticket.created.is_none());
        assert!(ticket.updated.is_some());
    }

    #[test]
    fn test_jira_ticket_offset_without_colon() {
        let ticket: JiraTicket = serde_json::from_value(json!({
            "key": "PROJ-2",
            "created": "2024-01-15T10:30:00.000+0000"
        }))
        .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(ticket.created, Some(expected));
        assert_eq!(ticket.summary, "");
        assert_eq!(ticket.status, "");
    }

    #[test]
    fn test_zendesk_ticket_deserialization() {
        let ticket: ZendeskTicket = serde_json::from_value(json!({
            "id": 4711,
            "subject": "Cannot export report",
            "status": "open",
            "priority": "high",
            "created_at": "2024-02-01T08:00:00Z",
            "satisfaction_rating": {"score": 4.0, "created_at": "2024-02-10T08:00:00Z"}
        }))
        .unwrap();

        assert_eq!(ticket.id, 4711);
        assert_eq!(
            ticket.satisfaction_rating.as_ref().unwrap().score,
            Some(4.0)
        );
        assert!(ticket.updated_at.is_none());
    }

    #[test]
    fn test_ticket_tagged_union_roundtrip() {
        let ticket = Ticket::Jira(JiraTicket {
            key: "PROJ-9".to_string(),
            summary: "Slow dashboard".to_string(),
            status: "In Progress".to_string(),
            priority: "Medium".to_string(),
            created: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
            updated: None,
            assignee: Some("dana".to_string()),
            url: None,
        });

        let serialized = serde_json::to_value(&ticket).unwrap();
        assert_eq!(serialized["kind"], "jira");
        assert_eq!(serialized["key"], "PROJ-9");

        let deserialized: Ticket = serde_json::from_value(serialized).unwrap();
        assert_eq!(deserialized, ticket);
        assert_eq!(deserialized.kind(), TicketKind::Jira);
        assert_eq!(deserialized.id(), "PROJ-9");
        assert_eq!(deserialized.summary(), "Slow dashboard");
    }

    #[test]
    fn test_ticket_accessors_zendesk() {
        let ticket = Ticket::Zendesk(ZendeskTicket {
            id: 99,
            subject: "Billing question".to_string(),
            status: "pending".to_string(),
            priority: "normal".to_string(),
            created_at: None,
            updated_at: Some(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap()),
            satisfaction_rating: None,
            assignee_id: Some(5),
            url: Some("https://example.zendesk.com/tickets/99".to_string()),
        });

        assert_eq!(ticket.kind(), TicketKind::Zendesk);
        assert_eq!(ticket.id(), "99");
        assert_eq!(ticket.status(), "pending");
        assert_eq!(ticket.priority(), "normal");
        assert!(ticket.created().is_none());
        assert!(ticket.updated().is_some());
        assert_eq!(
            ticket.url(),
            Some("https://example.zendesk.com/tickets/99")
        );
    }

    #[test]
    fn test_user_with_bare_customer_id() {
        let user: User = serde_json::from_value(json!({
            "id": "usr_1",
            "name": "Pat",
            "email": "pat@example.com",
            "role": "client",
            "customerId": "cus_1"
        }))
        .unwrap();

        assert_eq!(user.role, Role::Client);
        assert_eq!(user.customer.as_ref().unwrap().id(), "cus_1");
        assert!(!user.can_impersonate);
    }

    #[test]
    fn test_user_with_populated_customer() {
        let user: User = serde_json::from_value(json!({
            "id": "usr_2",
            "name": "Sam",
            "email": "sam@example.com",
            "role": "admin",
            "customerId": {"id": "cus_7", "name": "Initech", "healthScore": 3.0},
            "canImpersonate": true,
            "reportingPermissions": {
                "canGenerate": true,
                "allowedCustomers": ["cus_7"]
            }
        }))
        .unwrap();

        assert_eq!(user.customer.as_ref().unwrap().id(), "cus_7");
        assert!(user.can_impersonate);
        let perms = user.reporting_permissions.unwrap();
        assert!(perms.can_generate);
        assert!(!perms.can_schedule);
        assert_eq!(perms.allowed_customers, vec!["cus_7".to_string()]);
    }

    #[test]
    fn test_impersonation_session_expiry() {
        let started = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let session = ImpersonationSession {
            token: "imp-token".to_string(),
            target: ImpersonationTarget::Customer {
                id: "cus_1".to_string(),
                name: "Acme".to_string(),
            },
            reason: "support escalation".to_string(),
            started_at: started,
            duration_minutes: 30,
        };

        assert!(!session.is_expired(started + chrono::Duration::minutes(29)));
        assert!(session.is_expired(started + chrono::Duration::minutes(30)));
        assert!(session.is_expired(started + chrono::Duration::hours(2)));
    }

    #[test]
    fn test_lenient_datetime_epoch_values() {
        let seconds = lenient_datetime::parse_value(&json!(1_710_509_130));
        let millis = lenient_datetime::parse_value(&json!(1_710_509_130_000_i64));
        assert_eq!(seconds, millis);
        assert!(seconds.is_some());
    }

    #[test]
    fn test_lenient_datetime_rejects_garbage() {
        assert!(lenient_datetime::parse_value(&json!(null)).is_none());
        assert!(lenient_datetime::parse_value(&json!("")).is_none());
        assert!(lenient_datetime::parse_value(&json!("soon")).is_none());
        assert!(lenient_datetime::parse_value(&json!({"nested": true})).is_none());
    }

    #[test]
    fn test_lenient_datetime_date_only() {
        let parsed = lenient_datetime::parse_str("2024-06-01");
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
    }
}
