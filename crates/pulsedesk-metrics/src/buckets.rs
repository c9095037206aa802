//! Ticket classification and bucketing
//!
//! Partitions the full set of Jira and Zendesk tickets for one customer into
//! the named buckets behind the summary cards. Every function takes the
//! current time as a parameter, so bucket membership is deterministic and
//! testable without touching the wall clock. Input slices are never mutated.

use chrono::{DateTime, Duration, Utc};
use pulsedesk_core::{JiraTicket, ZendeskTicket};
use serde::Serialize;

/// Jira statuses treated as closed
pub const JIRA_CLOSED_STATUSES: [&str; 3] = ["Done", "Closed", "Resolved"];

/// Zendesk statuses treated as closed
pub const ZENDESK_CLOSED_STATUSES: [&str; 2] = ["solved", "closed"];

/// Jira priorities that make an open ticket critical regardless of age
pub const JIRA_CRITICAL_PRIORITIES: [&str; 3] = ["Critical", "Highest", "Blocker"];

/// Zendesk priorities that make an open ticket critical regardless of age
pub const ZENDESK_CRITICAL_PRIORITIES: [&str; 2] = ["urgent", "high"];

/// Status fragments that place a Jira ticket in the development bucket
const DEVELOPMENT_MARKERS: [&str; 4] = ["in development", "development", "in progress", "dev"];

/// Days after which an open ticket becomes critical on age alone
const CRITICAL_AGE_DAYS: i64 = 7;

/// Window for the "last 30 days" buckets
const RECENT_WINDOW_DAYS: i64 = 30;

/// Age past which a still-open ticket counts as stale
const STALE_AGE_DAYS: i64 = 90;

/// Buckets derived from a customer's Jira tickets
#[derive(Debug, Default, Clone, Serialize)]
pub struct JiraBuckets<'a> {
    /// Created in the last 30 days and still open
    pub open_last_30_days: Vec<&'a JiraTicket>,

    /// Created in the last 30 days and closed
    pub closed_last_30_days: Vec<&'a JiraTicket>,

    /// Created more than 90 days ago and still open
    pub stale_open: Vec<&'a JiraTicket>,

    /// Status contains a development marker, case-insensitively
    pub in_development: Vec<&'a JiraTicket>,

    /// Open and either high priority or open for more than 7 days
    pub critical: Vec<&'a JiraTicket>,
}

/// Buckets derived from a customer's Zendesk tickets
#[derive(Debug, Default, Clone, Serialize)]
pub struct ZendeskBuckets<'a> {
    /// Created in the last 30 days and still open
    pub open_last_30_days: Vec<&'a ZendeskTicket>,

    /// Created in the last 30 days and closed
    pub closed_last_30_days: Vec<&'a ZendeskTicket>,

    /// Created more than 90 days ago and still open
    pub stale_open: Vec<&'a ZendeskTicket>,

    /// Open and either high priority or open for more than 7 days
    pub critical: Vec<&'a ZendeskTicket>,
}

/// All summary-card buckets for one customer.
///
/// A ticket appears in at most one of the time-bounded buckets for its
/// tracker, and independently may also appear in `critical` or
/// `in_development`. Tickets with a missing or unparsable creation timestamp
/// are excluded from every time-bounded bucket.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TicketBuckets<'a> {
    /// Jira-side buckets
    pub jira: JiraBuckets<'a>,

    /// Zendesk-side buckets
    pub zendesk: ZendeskBuckets<'a>,
}

/// Whether a Jira status string counts as closed
#[must_use]
pub fn jira_is_closed(status: &str) -> bool {
    JIRA_CLOSED_STATUSES.contains(&status.trim())
}

/// Whether a Zendesk status string counts as closed
#[must_use]
pub fn zendesk_is_closed(status: &str) -> bool {
    ZENDESK_CLOSED_STATUSES.contains(&status.trim())
}

/// Whether a Jira status string places the ticket in development
#[must_use]
pub fn is_in_development(status: &str) -> bool {
    let lowered = status.to_lowercase();
    DEVELOPMENT_MARKERS.iter().any(|m| lowered.contains(m))
}

fn within_window(created: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    created.is_some_and(|c| c >= cutoff)
}

fn older_than(created: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    created.is_some_and(|c| c < cutoff)
}

/// Partition a customer's tickets into the summary-card buckets
#[must_use]
pub fn bucket_tickets<'a>(
    jira: &'a [JiraTicket],
    zendesk: &'a [ZendeskTicket],
    now: DateTime<Utc>,
) -> TicketBuckets<'a> {
    let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let stale_cutoff = now - Duration::days(STALE_AGE_DAYS);
    let critical_cutoff = now - Duration::days(CRITICAL_AGE_DAYS);

    let mut buckets = TicketBuckets::default();

    for ticket in jira {
        let closed = jira_is_closed(&ticket.status);

        if within_window(ticket.created, recent_cutoff) {
            if closed {
                buckets.jira.closed_last_30_days.push(ticket);
            } else {
                buckets.jira.open_last_30_days.push(ticket);
            }
        } else if older_than(ticket.created, stale_cutoff) && !closed {
            buckets.jira.stale_open.push(ticket);
        }

        if is_in_development(&ticket.status) {
            buckets.jira.in_development.push(ticket);
        }

        if !closed
            && (JIRA_CRITICAL_PRIORITIES.contains(&ticket.priority.as_str())
                || older_than(ticket.created, critical_cutoff))
        {
            buckets.jira.critical.push(ticket);
        }
    }

    for ticket in zendesk {
        let closed = zendesk_is_closed(&ticket.status);

        if within_window(ticket.created_at, recent_cutoff) {
            if closed {
                buckets.zendesk.closed_last_30_days.push(ticket);
            } else {
                buckets.zendesk.open_last_30_days.push(ticket);
            }
        } else if older_than(ticket.created_at, stale_cutoff) && !closed {
            buckets.zendesk.stale_open.push(ticket);
        }

        if !closed
            && (ZENDESK_CRITICAL_PRIORITIES.contains(&ticket.priority.as_str())
                || older_than(ticket.created_at, critical_cutoff))
        {
            buckets.zendesk.critical.push(ticket);
        }
    }

    buckets
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn frozen_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn jira(key: &str, status: &str, priority: &str, age_days: Option<i64>) -> JiraTicket {
        JiraTicket {
            key: key.to_string(),
            summary: format!("{key} summary"),
            status: status.to_string(),
            priority: priority.to_string(),
            created: age_days.map(|d| frozen_now() - Duration::days(d)),
            updated: None,
            assignee: None,
            url: None,
        }
    }

    fn zendesk(id: i64, status: &str, priority: &str, age_days: Option<i64>) -> ZendeskTicket {
        ZendeskTicket {
            id,
            subject: format!("ticket {id}"),
            status: status.to_string(),
            priority: priority.to_string(),
            created_at: age_days.map(|d| frozen_now() - Duration::days(d)),
            updated_at: None,
            satisfaction_rating: None,
            assignee_id: None,
            url: None,
        }
    }

    fn keys(bucket: &[&JiraTicket]) -> Vec<String> {
        bucket.iter().map(|t| t.key.clone()).collect()
    }

    fn ids(bucket: &[&ZendeskTicket]) -> Vec<i64> {
        bucket.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_recent_open_jira_ticket_lands_only_in_open_bucket() {
        let tickets = vec![jira("PROJ-1", "Open", "Medium", Some(5))];
        let buckets = bucket_tickets(&tickets, &[], frozen_now());

        assert_eq!(keys(&buckets.jira.open_last_30_days), vec!["PROJ-1"]);
        assert!(buckets.jira.closed_last_30_days.is_empty());
        assert!(buckets.jira.stale_open.is_empty());
    }

    #[test]
    fn test_recent_closed_jira_ticket() {
        for status in JIRA_CLOSED_STATUSES {
            let tickets = vec![jira("PROJ-2", status, "Low", Some(10))];
            let buckets = bucket_tickets(&tickets, &[], frozen_now());

            assert!(buckets.jira.open_last_30_days.is_empty());
            assert_eq!(keys(&buckets.jira.closed_last_30_days), vec!["PROJ-2"]);
            assert!(buckets.jira.critical.is_empty());
        }
    }

    #[test]
    fn test_stale_open_jira_ticket() {
        let tickets = vec![jira("PROJ-3", "Open", "Low", Some(120))];
        let buckets = bucket_tickets(&tickets, &[], frozen_now());

        assert_eq!(keys(&buckets.jira.stale_open), vec!["PROJ-3"]);
        assert!(buckets.jira.open_last_30_days.is_empty());
        // Also critical on age alone
        assert_eq!(keys(&buckets.jira.critical), vec!["PROJ-3"]);
    }

    #[test]
    fn test_middle_aged_ticket_in_no_time_bucket() {
        // 60 days old: too old for the 30-day window, too young for stale
        let tickets = vec![jira("PROJ-4", "Open", "Low", Some(60))];
        let buckets = bucket_tickets(&tickets, &[], frozen_now());

        assert!(buckets.jira.open_last_30_days.is_empty());
        assert!(buckets.jira.closed_last_30_days.is_empty());
        assert!(buckets.jira.stale_open.is_empty());
        // Still critical: open for more than 7 days
        assert_eq!(keys(&buckets.jira.critical), vec!["PROJ-4"]);
    }

    #[test]
    fn test_in_development_markers_case_insensitive() {
        for status in ["In Development", "DEVELOPMENT", "in progress", "Dev Review"] {
            assert!(is_in_development(status), "{status} should match");
        }
        assert!(!is_in_development("Open"));
        assert!(!is_in_development(""));
    }

    #[test]
    fn test_in_development_bucket_is_independent_of_time() {
        let tickets = vec![jira("PROJ-5", "In Progress", "Low", Some(200))];
        let buckets = bucket_tickets(&tickets, &[], frozen_now());

        assert_eq!(keys(&buckets.jira.in_development), vec!["PROJ-5"]);
        assert_eq!(keys(&buckets.jira.stale_open), vec!["PROJ-5"]);
    }

    #[test]
    fn test_critical_jira_by_priority() {
        for priority in JIRA_CRITICAL_PRIORITIES {
            let tickets = vec![jira("PROJ-6", "Open", priority, Some(1))];
            let buckets = bucket_tickets(&tickets, &[], frozen_now());
            assert_eq!(keys(&buckets.jira.critical), vec!["PROJ-6"]);
        }
    }

    #[test]
    fn test_fresh_high_priority_jira_not_critical() {
        // "High" is not in the Jira critical set, and two days is not old enough
        let tickets = vec![jira("PROJ-7", "Open", "High", Some(2))];
        let buckets = bucket_tickets(&tickets, &[], frozen_now());
        assert!(buckets.jira.critical.is_empty());
    }

    #[test]
    fn test_closed_ticket_never_critical() {
        let tickets = vec![jira("PROJ-8", "Done", "Blocker", Some(100))];
        let buckets = bucket_tickets(&tickets, &[], frozen_now());
        assert!(buckets.jira.critical.is_empty());
        assert!(buckets.jira.stale_open.is_empty());
    }

    #[test]
    fn test_missing_created_excluded_from_time_buckets() {
        let tickets = vec![jira("PROJ-9", "Open", "Low", None)];
        let buckets = bucket_tickets(&tickets, &[], frozen_now());

        assert!(buckets.jira.open_last_30_days.is_empty());
        assert!(buckets.jira.closed_last_30_days.is_empty());
        assert!(buckets.jira.stale_open.is_empty());
        // Not critical either: the age clause evaluates to false
        assert!(buckets.jira.critical.is_empty());
    }

    #[test]
    fn test_missing_created_with_critical_priority_still_critical() {
        let tickets = vec![jira("PROJ-10", "Open", "Blocker", None)];
        let buckets = bucket_tickets(&tickets, &[], frozen_now());
        assert_eq!(keys(&buckets.jira.critical), vec!["PROJ-10"]);
    }

    #[test]
    fn test_empty_status_counts_as_open() {
        let tickets = vec![jira("PROJ-11", "", "Low", Some(3))];
        let buckets = bucket_tickets(&tickets, &[], frozen_now());

        assert_eq!(keys(&buckets.jira.open_last_30_days), vec!["PROJ-11"]);
        assert!(buckets.jira.in_development.is_empty());
    }

    #[test]
    fn test_zendesk_closed_set() {
        for status in ZENDESK_CLOSED_STATUSES {
            let tickets = vec![zendesk(1, status, "low", Some(5))];
            let buckets = bucket_tickets(&[], &tickets, frozen_now());
            assert_eq!(ids(&buckets.zendesk.closed_last_30_days), vec![1]);
            assert!(buckets.zendesk.critical.is_empty());
        }
    }

    #[test]
    fn test_zendesk_critical_by_priority() {
        for priority in ZENDESK_CRITICAL_PRIORITIES {
            let tickets = vec![zendesk(2, "open", priority, Some(1))];
            let buckets = bucket_tickets(&[], &tickets, frozen_now());
            assert_eq!(ids(&buckets.zendesk.critical), vec![2]);
        }
    }

    #[test]
    fn test_mixed_trackers_age_based_criticality() {
        // One Jira ticket created 10 days ago, priority High, status Open.
        let jira_tickets = vec![jira("PROJ-20", "Open", "High", Some(10))];
        // One Zendesk ticket created 100 days ago, priority low, status open.
        let zendesk_tickets = vec![zendesk(3, "open", "low", Some(100))];

        let buckets = bucket_tickets(&jira_tickets, &zendesk_tickets, frozen_now());

        // Jira: in open-30d, critical via age only (priority High is not in
        // the Jira critical set but 10 days > 7 days)
        assert_eq!(keys(&buckets.jira.open_last_30_days), vec!["PROJ-20"]);
        assert_eq!(keys(&buckets.jira.critical), vec!["PROJ-20"]);

        // Zendesk: stale and critical on age
        assert_eq!(ids(&buckets.zendesk.stale_open), vec![3]);
        assert_eq!(ids(&buckets.zendesk.critical), vec![3]);
        assert!(buckets.zendesk.open_last_30_days.is_empty());
    }

    #[test]
    fn test_thirty_day_and_ninety_day_buckets_disjoint() {
        let jira_tickets: Vec<JiraTicket> = [1, 5, 29, 31, 89, 91, 150]
            .iter()
            .enumerate()
            .map(|(i, days)| jira(&format!("PROJ-{i}"), "Open", "Low", Some(*days)))
            .collect();

        let buckets = bucket_tickets(&jira_tickets, &[], frozen_now());

        let recent = keys(&buckets.jira.open_last_30_days);
        let stale = keys(&buckets.jira.stale_open);
        for key in &recent {
            assert!(!stale.contains(key), "{key} appears in both time buckets");
        }
        assert_eq!(recent.len(), 3);
        assert_eq!(stale.len(), 2);
    }

    #[test]
    fn test_inputs_not_mutated_and_order_preserved() {
        let jira_tickets = vec![
            jira("PROJ-30", "Open", "Blocker", Some(3)),
            jira("PROJ-31", "Open", "Critical", Some(4)),
        ];
        let before = jira_tickets.clone();

        let buckets = bucket_tickets(&jira_tickets, &[], frozen_now());
        assert_eq!(keys(&buckets.jira.critical), vec!["PROJ-30", "PROJ-31"]);
        assert_eq!(jira_tickets, before);
    }
}
