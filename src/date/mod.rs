//! Date handling for the readings source
//!
//! Vatican News publishes one page per day under `{base}/YYYY/MM/DD.html`.
//! The requested date is shifted by a configurable number of days before the
//! path segment is built; the default shift is one day forward, used by every
//! transport alike.

use crate::ReadingsError;
use chrono::{Duration, NaiveDate, Utc};

/// Accepted input format for reading dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` string into a calendar date
///
/// Surrounding whitespace is ignored. Any other shape, or an impossible
/// calendar date such as `2025-02-30`, is rejected.
///
/// # Example
///
/// ```
/// use lecturas::date::parse_reading_date;
///
/// let date = parse_reading_date("2025-12-03").unwrap();
/// assert_eq!(date.to_string(), "2025-12-03");
/// assert!(parse_reading_date("not-a-date").is_err());
/// ```
pub fn parse_reading_date(input: &str) -> Result<NaiveDate, ReadingsError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        ReadingsError::InvalidDateFormat {
            input: input.to_string(),
        }
    })
}

/// Builds the `YYYY/MM/DD` path segment for a date after applying `day_offset`
pub fn url_path_segment(date: NaiveDate, day_offset: i64) -> Result<String, ReadingsError> {
    let shifted = date
        .checked_add_signed(Duration::days(day_offset))
        .ok_or_else(|| ReadingsError::InvalidDateFormat {
            input: date.format(DATE_FORMAT).to_string(),
        })?;

    Ok(shifted.format("%Y/%m/%d").to_string())
}

/// Builds the full page URL for a date
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use lecturas::date::target_url;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
/// let url = target_url("https://www.vaticannews.va/es/evangelio-de-hoy/", date, 1).unwrap();
/// assert_eq!(url, "https://www.vaticannews.va/es/evangelio-de-hoy/2025/01/06.html");
/// ```
pub fn target_url(base_url: &str, date: NaiveDate, day_offset: i64) -> Result<String, ReadingsError> {
    let segment = url_path_segment(date, day_offset)?;
    Ok(format!("{}/{}.html", base_url.trim_end_matches('/'), segment))
}

/// Today's date (UTC) in `YYYY-MM-DD` form, used when no date is supplied
pub fn today() -> String {
    Utc::now().date_naive().format(DATE_FORMAT).to_string()
}
