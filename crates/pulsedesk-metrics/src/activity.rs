//! Recent-activity derivation
//!
//! Merges both trackers into one feed: items touched in the last 7 days,
//! newest first, capped at 10.

use chrono::{DateTime, Duration, Utc};
use pulsedesk_core::{Ticket, TicketKind};
use serde::{Deserialize, Serialize};

/// Window for the activity feed
const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Maximum number of feed entries
const ACTIVITY_LIMIT: usize = 10;

/// What happened to the ticket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    /// Ticket was created and has not been touched since
    Created,
    /// Ticket was updated after creation
    Updated,
}

/// One entry in the recent-activity feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityItem {
    /// Ticket display id
    pub id: String,

    /// Tracker the ticket came from
    pub kind: TicketKind,

    /// Created or updated
    pub action: ActivityAction,

    /// Summary or subject line
    pub summary: String,

    /// Current status
    pub status: String,

    /// Effective timestamp: the update time when present, else creation
    pub date: DateTime<Utc>,

    /// Link into the tracker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Derive the recent-activity feed from a merged ticket list
#[must_use]
pub fn recent_activity(tickets: &[Ticket], now: DateTime<Utc>) -> Vec<ActivityItem> {
    let cutoff = now - Duration::days(ACTIVITY_WINDOW_DAYS);

    let mut items: Vec<ActivityItem> = tickets
        .iter()
        .filter_map(|ticket| {
            let date = ticket.updated().or_else(|| ticket.created())?;
            if date < cutoff {
                return None;
            }
            let action = if ticket.updated().is_some() && ticket.updated() != ticket.created() {
                ActivityAction::Updated
            } else {
                ActivityAction::Created
            };
            Some(ActivityItem {
                id: ticket.id(),
                kind: ticket.kind(),
                action,
                summary: ticket.summary().to_string(),
                status: ticket.status().to_string(),
                date,
                url: ticket.url().map(String::from),
            })
        })
        .collect();

    items.sort_by(|a, b| b.date.cmp(&a.date));
    items.truncate(ACTIVITY_LIMIT);
    items
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use pulsedesk_core::{JiraTicket, ZendeskTicket};

    fn frozen_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn jira(key: &str, created_h: Option<i64>, updated_h: Option<i64>) -> Ticket {
        Ticket::Jira(JiraTicket {
            key: key.to_string(),
            summary: format!("{key} summary"),
            status: "Open".to_string(),
            priority: "Medium".to_string(),
            created: created_h.map(|h| frozen_now() - Duration::hours(h)),
            updated: updated_h.map(|h| frozen_now() - Duration::hours(h)),
            assignee: None,
            url: Some(format!("https://jira.example.com/{key}")),
        })
    }

    fn zendesk(id: i64, created_h: Option<i64>, updated_h: Option<i64>) -> Ticket {
        Ticket::Zendesk(ZendeskTicket {
            id,
            subject: format!("ticket {id}"),
            status: "open".to_string(),
            priority: "normal".to_string(),
            created_at: created_h.map(|h| frozen_now() - Duration::hours(h)),
            updated_at: updated_h.map(|h| frozen_now() - Duration::hours(h)),
            satisfaction_rating: None,
            assignee_id: None,
            url: None,
        })
    }

    #[test]
    fn test_merges_trackers_and_sorts_descending() {
        let tickets = vec![
            jira("PROJ-1", Some(48), None),
            zendesk(100, Some(2), None),
            jira("PROJ-2", Some(24), Some(1)),
        ];

        let feed = recent_activity(&tickets, frozen_now());
        let ids: Vec<&str> = feed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["PROJ-2", "100", "PROJ-1"]);
        assert_eq!(feed[0].kind, TicketKind::Jira);
        assert_eq!(feed[1].kind, TicketKind::Zendesk);
    }

    #[test]
    fn test_items_older_than_seven_days_excluded() {
        let tickets = vec![
            jira("PROJ-1", Some(24 * 8), None),
            jira("PROJ-2", Some(24 * 6), None),
        ];

        let feed = recent_activity(&tickets, frozen_now());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, "PROJ-2");
    }

    #[test]
    fn test_update_timestamp_revives_old_ticket() {
        // Created long ago but updated yesterday: inside the window
        let tickets = vec![jira("PROJ-3", Some(24 * 90), Some(24))];

        let feed = recent_activity(&tickets, frozen_now());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].action, ActivityAction::Updated);
    }

    #[test]
    fn test_action_created_when_timestamps_equal() {
        let tickets = vec![jira("PROJ-4", Some(3), Some(3))];

        let feed = recent_activity(&tickets, frozen_now());
        assert_eq!(feed[0].action, ActivityAction::Created);
    }

    #[test]
    fn test_action_created_when_never_updated() {
        let tickets = vec![zendesk(101, Some(5), None)];

        let feed = recent_activity(&tickets, frozen_now());
        assert_eq!(feed[0].action, ActivityAction::Created);
    }

    #[test]
    fn test_capped_at_ten_entries() {
        let tickets: Vec<Ticket> = (0..15).map(|i| jira(&format!("PROJ-{i}"), Some(i), None)).collect();

        let feed = recent_activity(&tickets, frozen_now());
        assert_eq!(feed.len(), 10);
        // Newest first
        assert_eq!(feed[0].id, "PROJ-0");
        assert_eq!(feed[9].id, "PROJ-9");
    }

    #[test]
    fn test_dateless_tickets_skipped() {
        let tickets = vec![jira("PROJ-5", None, None), zendesk(102, Some(1), None)];

        let feed = recent_activity(&tickets, frozen_now());
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, "102");
    }

    #[test]
    fn test_item_shape_carries_url_and_status() {
        let tickets = vec![jira("PROJ-6", Some(2), None)];

        let feed = recent_activity(&tickets, frozen_now());
        assert_eq!(feed[0].status, "Open");
        assert_eq!(
            feed[0].url.as_deref(),
            Some("https://jira.example.com/PROJ-6")
        );
    }
}
