use time::{Date, UtcOffset};

use crate::domain::{ActivityLog, Document, DocumentStatus};
use crate::normalize::timestamps::parse_timestamp;

/// Sentinel used by the dashboard's select boxes for "no constraint".
pub const ALL_SENTINEL: &str = "all";

/// Normalize a raw criterion: blank input and the `"all"` sentinel mean absent.
///
/// Other values are kept as typed, surrounding spaces included.
pub fn criterion(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let v = raw.trim();
    if v.is_empty() || v.eq_ignore_ascii_case(ALL_SENTINEL) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// A calendar day as seen from a particular UTC offset (the viewer's local calendar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: Date,
    pub offset: UtcOffset,
}

impl CalendarDay {
    pub fn new(date: Date, offset: UtcOffset) -> Self {
        Self { date, offset }
    }

    pub fn utc(date: Date) -> Self {
        Self::new(date, UtcOffset::UTC)
    }

    /// Use the system's local offset; UTC when it cannot be determined.
    pub fn local(date: Date) -> Self {
        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        Self::new(date, offset)
    }

    /// Whether the raw timestamp falls on this day. Unparseable timestamps never match.
    pub fn contains(&self, timestamp: &str) -> bool {
        parse_timestamp(timestamp)
            .map(|dt| dt.to_offset(self.offset).date() == self.date)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// Case-insensitive substring of `description`.
    pub search: Option<String>,
    /// Exact match on `action`.
    pub action: Option<String>,
    pub date: Option<CalendarDay>,
}

impl ActivityFilter {
    pub fn is_active(&self) -> bool {
        self.search.is_some() || self.action.is_some() || self.date.is_some()
    }

    pub fn matches(&self, entry: &ActivityLog) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(term) => contains_ignore_case(&entry.description, term),
            None => true,
        };
        let matches_action = match self.action.as_deref() {
            Some(action) => entry.action == action,
            None => true,
        };
        let matches_date = match &self.date {
            Some(day) => day.contains(&entry.timestamp),
            None => true,
        };
        matches_search && matches_action && matches_date
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    /// Case-insensitive substring of `name`.
    pub search: Option<String>,
    pub status: Option<DocumentStatus>,
    /// Case-sensitive substring of the MIME type (e.g. `pdf`).
    pub type_contains: Option<String>,
}

impl DocumentFilter {
    pub fn is_active(&self) -> bool {
        self.search.is_some() || self.status.is_some() || self.type_contains.is_some()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(term) => contains_ignore_case(&doc.name, term),
            None => true,
        };
        let matches_status = match self.status {
            Some(status) => doc.status == status,
            None => true,
        };
        let matches_type = match self.type_contains.as_deref() {
            Some(t) => doc.mime_type.contains(t),
            None => true,
        };
        matches_search && matches_status && matches_type
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Stable filter: the surviving entries keep their original relative order.
pub fn filter_activities<'a>(entries: &'a [ActivityLog], filter: &ActivityFilter) -> Vec<&'a ActivityLog> {
    entries.iter().filter(|e| filter.matches(e)).collect()
}

pub fn filter_documents<'a>(docs: &'a [Document], filter: &DocumentFilter) -> Vec<&'a Document> {
    docs.iter().filter(|d| filter.matches(d)).collect()
}

/// Empty-state text for the history view.
pub fn empty_history_message(filter: &ActivityFilter) -> &'static str {
    if filter.is_active() {
        "No activities match your filter criteria."
    } else {
        "No document activities have been recorded yet."
    }
}
