//! Core types and utilities for the Pulsedesk dashboard

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use types::{
    Customer, CustomerId, ImpersonationSession, ImpersonationTarget, JiraTicket, Role, Session,
    Ticket, TicketKind, User, UserId, ZendeskTicket,
};

/// Initialize the logging system
///
/// Reads `RUST_LOG` when set, otherwise falls back to the configured
/// `level`. Emits JSON when `format` is `json`, plain text otherwise.
pub fn init_logging(level: &str, format: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let registry = tracing_subscriber::registry().with(log_filter(level));
    if format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn log_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    #[test]
    fn test_configured_level_is_the_filter_fallback() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(super::log_filter("debug").to_string(), "debug");
        assert_eq!(
            super::log_filter("pulsedesk_client=trace").to_string(),
            "pulsedesk_client=trace"
        );
    }
}
