//! Derived health and ticket metrics for the Pulsedesk dashboard
//!
//! Pure, synchronous functions over already-fetched ticket and customer
//! arrays. Every time-dependent computation takes `now` as an explicit
//! parameter; nothing here reads the wall clock, performs I/O, or mutates
//! its inputs.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]

pub mod activity;
pub mod buckets;
pub mod filter;
pub mod health;
pub mod satisfaction;

// Re-export the main entry points
pub use activity::{recent_activity, ActivityAction, ActivityItem};
pub use buckets::{bucket_tickets, JiraBuckets, TicketBuckets, ZendeskBuckets};
pub use filter::{filter_tickets, paginate, FieldFilter, FilterState, TicketFilter};
pub use health::{classify_admin, classify_dashboard, classify_detail, HealthLevel, StatusColor};
pub use satisfaction::{satisfaction_score, SatisfactionSummary};
