//! REST client, session handling, and view orchestration for the Pulsedesk
//! dashboard
//!
//! The backend owns all data; this crate fetches it, guards access behind
//! the persisted session, and hands the fetched arrays to
//! `pulsedesk-metrics` for derivation.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod dashboard;
pub mod fetch;
pub mod guard;
pub mod impersonation;
pub mod notify;
pub mod session;
pub mod token;

// Re-export the main entry points
pub use api_client::{tag_tickets, ApiClient};
pub use dashboard::{CustomerDetail, CustomerSummary, Dashboard, TicketCounts};
pub use fetch::{CustomerListFetcher, FetchState};
pub use guard::{Landing, RouteOutcome, SessionGuard};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use session::{FileSessionStore, MemorySessionStore, PersistedSession, SessionStore};
