//! Calendar derivation engine.
//!
//! Pure functions from a date to its derived attributes:
//! - Date parsing for the formats the scrapers produce
//! - Calendar dimensions (quarter, ISO week, season, season phase, ...)
//! - Trend baseline (days since the corpus minimum date)
//! - Year-over-year growth

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::config::PhaseTable;
use crate::models::{CalendarDimensions, Quarter, Season};

/// Errors raised while deriving calendar attributes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
}

/// Date formats tried in order. padelfip publishes `DD/MM/YYYY`.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y"];

/// Parse a raw date string.
///
/// Blank input means "no date" and yields `Ok(None)`. Anything else must be a
/// real calendar date in one of the supported formats; `31/02/2026` is an
/// error, never coerced.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, CalendarError> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Some(date));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.date_naive()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Some(dt.date()));
    }

    Err(CalendarError::InvalidDate(s.to_string()))
}

/// Parse an optional raw field; `None` and blank both mean "no date".
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, CalendarError> {
    match raw {
        Some(s) => parse_date(s),
        None => Ok(None),
    }
}

/// Whole days from `corpus_min` to `date`. Negative when `date` is earlier.
pub fn days_since_start(date: NaiveDate, corpus_min: NaiveDate) -> i64 {
    date.signed_duration_since(corpus_min).num_days()
}

/// Earliest date of the corpus, computed once per run.
pub fn corpus_min_date<I>(dates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates.into_iter().min()
}

/// Derive every calendar dimension of `date`.
pub fn calendar_dimensions(
    date: NaiveDate,
    phases: &PhaseTable,
    corpus_min: NaiveDate,
) -> CalendarDimensions {
    CalendarDimensions {
        year: date.year(),
        month: date.month(),
        month_name: date.format("%B").to_string(),
        day: date.day(),
        quarter: Quarter::for_date(date),
        week_number: date.iso_week().week(),
        day_of_week: date.format("%A").to_string(),
        day_of_week_num: date.weekday().num_days_from_monday(),
        date_display: date.format("%Y-%m-%d").to_string(),
        season: Season::for_date(date),
        pre_post_season: phases.phase_for_date(date),
        days_since_start: days_since_start(date, corpus_min),
    }
}

/// Percentage growth from `previous` to `current`.
/// Undefined (`None`) when the previous count is zero.
pub fn growth_rate(previous: u32, current: u32) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}
