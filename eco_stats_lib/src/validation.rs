//! Date validation and formatting helpers.

use chrono::NaiveDate;

use crate::error::EcoStatsError;

/// Format used by every provider for calendar dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns true if `s` is a real calendar date in `YYYY-MM-DD` form.
pub fn validate_date(s: &str) -> bool {
    validate_date_with_format(s, ISO_DATE_FORMAT)
}

/// Returns true if `s` parses as a date under the `strftime`-style `format`.
pub fn validate_date_with_format(s: &str, format: &str) -> bool {
    NaiveDate::parse_from_str(s, format).is_ok()
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, EcoStatsError> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT).map_err(|_| {
        EcoStatsError::InvalidArgument(format!(
            "invalid date '{}': expected YYYY-MM-DD",
            s
        ))
    })
}

/// Formats `date` with a `strftime`-style format string.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Checks that both bounds are valid dates and `start <= end`.
pub fn validate_date_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), EcoStatsError> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;
    if start_date > end_date {
        return Err(EcoStatsError::InvalidArgument(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }
    Ok((start_date, end_date))
}
