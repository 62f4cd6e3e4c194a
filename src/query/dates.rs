use crate::error::{QueryError, Result};
use crate::utils::constants::{
    COMPACT_DATE_FORMAT, COMPACT_DATE_LEN, ISO_DATE_FORMAT, TRAILING_WINDOW_DAYS,
};
use chrono::{Days, NaiveDate};

/// Parse a caller-supplied `YYYYMMDD` date.
///
/// chrono accepts variable-width fields (`2017081` would parse), so the
/// width and digit check happens first.
pub fn parse_compact_date(input: &str) -> Result<NaiveDate> {
    let invalid = || QueryError::InvalidDateFormat {
        input: input.to_string(),
    };

    if input.len() != COMPACT_DATE_LEN || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(input, COMPACT_DATE_FORMAT).map_err(|_| invalid())
}

/// Parse a stored `YYYY-MM-DD` date.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT)?)
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn format_compact_date(date: NaiveDate) -> String {
    date.format(COMPACT_DATE_FORMAT).to_string()
}

/// First day of the trailing window ending at `end`: a fixed 365-day
/// subtraction, not "same day last year". The two differ when the window
/// spans a February 29th.
pub fn trailing_window_start(end: NaiveDate) -> Result<NaiveDate> {
    end.checked_sub_days(Days::new(TRAILING_WINDOW_DAYS))
        .ok_or(QueryError::DateOutOfRange(end))
}
