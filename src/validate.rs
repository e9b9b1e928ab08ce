// Input validation for new tasks

use crate::error::{Error, Result};
use crate::models::Priority;
use chrono::{Local, NaiveDate};
use tracing::debug;

/// Due dates are accepted in this form only
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's calendar day in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Reject empty or whitespace-only titles
pub fn title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("task title cannot be empty".to_string()));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` due date
///
/// `None` and the empty string both mean "no due date".
pub fn parse_due_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };

    // chrono tolerates padding, signs and short fields; require the exact shape
    if !has_date_shape(raw) {
        return Err(invalid_due_date());
    }

    NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT)
        .map(Some)
        .map_err(|_| invalid_due_date())
}

/// A due date may be today but not earlier
pub fn due_date_not_past(due: NaiveDate, today: NaiveDate) -> Result<()> {
    if due < today {
        return Err(Error::Validation("due date cannot be in the past".to_string()));
    }
    Ok(())
}

/// Map any priority string onto the closed set, falling back to medium
pub fn coerce_priority(raw: &str) -> Priority {
    raw.parse().unwrap_or_else(|_| {
        debug!(raw, "coerce_priority: unknown priority, using medium");
        Priority::Medium
    })
}

// Digits at every position except `-` at indices 4 and 7
fn has_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn invalid_due_date() -> Error {
    Error::Validation("invalid due date format, expected YYYY-MM-DD".to_string())
}
