use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, time};
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// One task record. `due`, when set, is midnight UTC of the chosen
/// calendar day and is persisted as an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due: Option<OffsetDateTime>,
}

impl TodoItem {
    /// An item is overdue once `now` is past 23:59:59.999 of its due day,
    /// taken in `offset`. Completed items are never overdue.
    pub fn is_overdue(&self, now: OffsetDateTime, offset: UtcOffset) -> bool {
        if self.completed {
            return false;
        }
        match self.due {
            Some(due) => now > end_of_day(due, offset),
            None => false,
        }
    }
}

fn end_of_day(due: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
    let day = due.to_offset(offset).date();
    PrimitiveDateTime::new(day, time!(23:59:59.999)).assume_offset(offset)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub text: String,
    pub due: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

/// What the surface renders: the item plus its display-only state.
#[derive(Debug, Clone, Serialize)]
pub struct TodoView {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due: Option<OffsetDateTime>,
    pub due_display: Option<String>,
    pub overdue: bool,
    pub removing: bool,
}

impl TodoView {
    pub fn project(
        item: &TodoItem,
        removing: bool,
        now: OffsetDateTime,
        offset: UtcOffset,
    ) -> Self {
        Self {
            id: item.id,
            text: item.text.clone(),
            completed: item.completed,
            due: item.due,
            due_display: item.due.map(|due| due_display(due, offset)),
            overdue: item.is_overdue(now, offset),
            removing,
        }
    }

    /// An empty query matches everything; otherwise the normalized query
    /// must appear in the text or in the formatted due display,
    /// case-insensitively.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        if self.text.to_lowercase().contains(query) {
            return true;
        }
        self.due_display
            .as_deref()
            .is_some_and(|display| display.to_lowercase().contains(query))
    }
}

const DUE_DISPLAY: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
const DUE_INPUT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn due_display(due: OffsetDateTime, offset: UtcOffset) -> String {
    due.to_offset(offset)
        .date()
        .format(DUE_DISPLAY)
        .unwrap_or_default()
}

/// Parses a due value from the surface: either the date control's bare
/// `YYYY-MM-DD` (normalized to midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_due(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(day) = Date::parse(raw, DUE_INPUT) {
        return Some(day.midnight().assume_utc());
    }
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

/// Normalizes a search query: trim, lowercase, collapse internal
/// whitespace runs to single spaces.
pub fn normalize_query(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
