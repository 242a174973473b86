//! Database repositories for each table.

pub mod prompts;
pub mod saved;
pub mod users;

pub use prompts::PromptsRepo;
pub use saved::SavedPromptsRepo;
pub use users::UsersRepo;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use crate::error::InvalidColumnValue;

/// Read a closed-set text column, failing on values the enum does not know.
pub(crate) fn enum_column<T>(
    row: &Row<'_>,
    idx: usize,
    column: &'static str,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(InvalidColumnValue { column, value: raw }),
        )
    })
}

/// Read a timestamp column written by SQLite `datetime('now')` or as RFC 3339.
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(InvalidColumnValue {
                column: "timestamp",
                value: raw,
            }),
        )
    })
}

/// Parse a datetime from SQLite format.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .ok()
}
