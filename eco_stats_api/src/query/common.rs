//! Shared query infrastructure: the [`Query`] trait, [`SortDirection`], and
//! argument checks used by every service's builders.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::errors::{validation, Error};

/// Trait implemented by all query builders.
pub trait Query {
    /// Checks caller-supplied arguments. Runs before anything is sent.
    fn validate(&self) -> Result<(), Error>;

    /// Query parameter pairs in the order they are sent, excluding credentials.
    fn to_query_pairs(&self) -> Vec<(String, String)>;
}

/// Sort order for API results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (oldest first). This is the default.
    #[default]
    Asc,
    /// Descending order (newest first).
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(validation(format!(
                "unknown sort order '{}'. Valid values: asc, desc",
                s
            ))),
        }
    }
}

/// Fails if `value` is empty or only whitespace.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Fails unless `value` is exactly four ASCII digits.
pub fn validate_year(field: &str, value: &str) -> Result<u16, Error> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        // four digits always fit
        return Ok(value.parse::<u16>().unwrap_or_default());
    }
    Err(validation(format!(
        "{} must be a 4-digit year, got '{}'",
        field, value
    )))
}

/// Fails unless `value` is a calendar date in `YYYY-MM-DD` form.
pub fn validate_iso_date(field: &str, value: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        validation(format!(
            "{} must be a date in YYYY-MM-DD format, got '{}'",
            field, value
        ))
    })
}

/// Fails unless `value` is one of `allowed` (exact match).
pub fn validate_code(field: &str, value: &str, allowed: &[&str]) -> Result<(), Error> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(validation(format!(
        "unknown {} '{}'. Valid values: {}",
        field,
        value,
        allowed.join(", ")
    )))
}

/// Fails unless `min <= value <= max`.
pub fn validate_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), Error> {
    if value < min || value > max {
        return Err(validation(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years() {
        assert_eq!(validate_year("start_year", "2024").unwrap(), 2024);
        assert!(validate_year("start_year", "24").is_err());
        assert!(validate_year("start_year", "20x4").is_err());
        assert!(validate_year("start_year", "20245").is_err());
        assert!(validate_year("start_year", "２０２４").is_err());
    }

    #[test]
    fn iso_dates() {
        assert!(validate_iso_date("d", "2024-01-01").is_ok());
        assert!(validate_iso_date("d", "2024-02-30").is_err());
        assert!(validate_iso_date("d", "01/02/2024").is_err());
    }

    #[test]
    fn sort_direction_parsing() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!(SortDirection::default().to_string(), "asc");
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn codes_and_ranges() {
        assert!(validate_code("units", "lin", &["lin", "chg"]).is_ok());
        let err = validate_code("units", "xyz", &["lin", "chg"]).unwrap_err();
        assert!(err.to_string().contains("lin, chg"));
        assert!(validate_range("limit", 0, 1, 1000).is_err());
        assert!(validate_range("limit", 1000, 1, 1000).is_ok());
    }
}
