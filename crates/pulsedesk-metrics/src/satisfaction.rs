//! Customer satisfaction score
//!
//! Averages Zendesk satisfaction ratings into a percentage. Absence of
//! ratings is distinguished from a zero score so the UI can omit the card
//! instead of showing "0%".

use chrono::{DateTime, Duration, Utc};
use pulsedesk_core::ZendeskTicket;
use serde::{Deserialize, Serialize};

/// Ratings recorded within this many days count as recent
const RECENT_RATING_DAYS: i64 = 30;

/// Ratings arrive on a 0-5 scale; multiply by this to get a percentage
const PERCENT_PER_POINT: f64 = 20.0;

/// Aggregated satisfaction over a customer's rated Zendesk tickets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SatisfactionSummary {
    /// Mean rating converted to a 0-100 percentage
    pub percentage: f64,

    /// Number of tickets carrying a rating
    pub rated_tickets: usize,

    /// Ratings recorded in the last 30 days
    pub recent_ratings: usize,
}

/// Compute the satisfaction summary, or `None` when no ticket carries a
/// rating
#[must_use]
pub fn satisfaction_score(
    tickets: &[ZendeskTicket],
    now: DateTime<Utc>,
) -> Option<SatisfactionSummary> {
    let cutoff = now - Duration::days(RECENT_RATING_DAYS);

    let mut total = 0.0;
    let mut rated = 0usize;
    let mut recent = 0usize;

    for ticket in tickets {
        let Some(rating) = &ticket.satisfaction_rating else {
            continue;
        };
        let Some(score) = rating.score else {
            continue;
        };
        total += score;
        rated += 1;
        if rating.created_at.is_some_and(|at| at >= cutoff) {
            recent += 1;
        }
    }

    if rated == 0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let percentage = total / rated as f64 * PERCENT_PER_POINT;

    Some(SatisfactionSummary {
        percentage,
        rated_tickets: rated,
        recent_ratings: recent,
    })
}
