//! Trade date normalization.
//!
//! Brokerage exports are inconsistent about date formats: US month-first with
//! two- or four-digit years, ISO dates, and any of these with a trailing time
//! component. [`parse_trade_date`] normalizes all of them to a [`NaiveDate`].

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Accepted date formats, in precedence order. When a string is parseable by
/// more than one format, the earlier format wins.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d"];

/// The format used for the final fallback attempt.
const PRIMARY_FORMAT: &str = "%m/%d/%Y";

/// A date string matched none of the accepted formats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("date '{input}' does not match any supported trade date format")]
pub struct DateParseError {
    /// The offending input, verbatim.
    pub input: String,
}

impl DateParseError {
    /// Create a new error for the given input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Parse a trade date string into a calendar date.
///
/// Each format in the accepted list is tried against the full string, both
/// bare and with a ` %H:%M:%S` time suffix. If nothing matches and the string
/// contains whitespace, the substring before the first whitespace is retried
/// (composite "date time" values with time shapes outside the known set).
/// The last resort is the primary `%m/%d/%Y` format.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use taxlot_core::parse_trade_date;
///
/// let d = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
/// assert_eq!(parse_trade_date("1/2/2023").unwrap(), d);
/// assert_eq!(parse_trade_date("01/02/23").unwrap(), d);
/// assert_eq!(parse_trade_date("2023-01-02").unwrap(), d);
/// assert_eq!(parse_trade_date("1/2/2023 09:30:00").unwrap(), d);
/// assert!(parse_trade_date("soon").is_err());
/// ```
pub fn parse_trade_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = raw.trim();

    if let Some(date) = try_formats(trimmed) {
        return Ok(date);
    }

    // Composite "date time" values: retry on the leading token only.
    if let Some(prefix) = trimmed.split_whitespace().next() {
        if prefix.len() < trimmed.len() {
            if let Some(date) = try_formats(prefix) {
                return Ok(date);
            }
        }
    }

    NaiveDate::parse_from_str(trimmed, PRIMARY_FORMAT)
        .map_err(|_| DateParseError::new(raw))
}

fn try_formats(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS.iter().find_map(|format| parse_one(s, format))
}

fn parse_one(s: &str, format: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, format).ok().or_else(|| {
        let with_time = format!("{format} %H:%M:%S");
        NaiveDateTime::parse_from_str(s, &with_time)
            .ok()
            .map(|datetime| datetime.date())
    })?;

    // chrono's %Y also consumes two-digit years; require a real four-digit
    // year so the %y format gets its turn.
    if format.contains("%Y") && date.year() < 1000 {
        return None;
    }
    Some(date)
}
