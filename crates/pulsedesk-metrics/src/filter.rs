//! Filter, search, and pagination over ticket lists
//!
//! Filtering is a pure function over an already-fetched array: no side
//! effects, source order preserved, same inputs always yield the same
//! subset. Pagination is a plain offset/limit slice. [`FilterState`] ties
//! the two together and resets the page index whenever a filter field
//! changes.

use pulsedesk_core::Ticket;
use serde::{Deserialize, Serialize};

/// Default page size for ticket tables
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A single-field filter with an `all` sentinel meaning "no constraint"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldFilter {
    /// No constraint
    #[default]
    All,
    /// Exact, case-insensitive match against this value
    Value(String),
}

impl From<String> for FieldFilter {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Value(raw)
        }
    }
}

impl From<FieldFilter> for String {
    fn from(filter: FieldFilter) -> Self {
        match filter {
            FieldFilter::All => "all".to_string(),
            FieldFilter::Value(v) => v,
        }
    }
}

impl FieldFilter {
    /// Whether a candidate field value passes this filter
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::All => true,
            Self::Value(v) => v.eq_ignore_ascii_case(candidate),
        }
    }
}

/// User-entered filter set for a ticket table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    /// Free-text search, matched case-insensitively as a substring
    #[serde(default)]
    pub search: String,

    /// Status constraint
    #[serde(default)]
    pub status: FieldFilter,

    /// Priority constraint
    #[serde(default)]
    pub priority: FieldFilter,
}

impl TicketFilter {
    /// Whether a ticket passes the whole filter set
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.matches_search(ticket)
            && self.status.matches(ticket.status())
            && self.priority.matches(ticket.priority())
    }

    fn matches_search(&self, ticket: &Ticket) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        match ticket {
            Ticket::Jira(t) => {
                t.summary.to_lowercase().contains(&needle)
                    || t.key.to_lowercase().contains(&needle)
                    || t.assignee
                        .as_deref()
                        .is_some_and(|a| a.to_lowercase().contains(&needle))
            }
            Ticket::Zendesk(t) => {
                t.subject.to_lowercase().contains(&needle)
                    || t.id.to_string().contains(&needle)
            }
        }
    }
}

/// Apply a filter set to a ticket slice, preserving source order
#[must_use]
pub fn filter_tickets<'a>(tickets: &'a [Ticket], filter: &TicketFilter) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| filter.matches(t)).collect()
}

/// Slice a filtered list into one page (offset/limit)
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page.saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// Filter plus page index for one ticket table.
///
/// Changing any filter field resets the page index to 0; changing the page
/// leaves the filter untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Current filter set
    pub filter: TicketFilter,

    /// Zero-based page index
    pub page: usize,

    /// Rows per page
    pub page_size: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            filter: TicketFilter::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    /// Update the search text and reset to the first page
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.page = 0;
    }

    /// Update the status constraint and reset to the first page
    pub fn set_status(&mut self, status: FieldFilter) {
        self.filter.status = status;
        self.page = 0;
    }

    /// Update the priority constraint and reset to the first page
    pub fn set_priority(&mut self, priority: FieldFilter) {
        self.filter.priority = priority;
        self.page = 0;
    }

    /// Move to another page without touching the filter
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Filter the tickets and slice out the current page
    #[must_use]
    pub fn apply<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        let filtered = filter_tickets(tickets, &self.filter);
        paginate(&filtered, self.page, self.page_size).to_vec()
    }
}
