//! Normalizes raw provider responses into flat observation lists.
//!
//! Each provider nests its data differently. [`extract_series`] walks the
//! documented shape for one provider and yields [`Observation`]s; anything
//! that does not match the shape is skipped rather than treated as an error.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::EcoStatsError;
use crate::validation::validate_date_range;

/// Provider a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Fred,
    Bls,
    Bea,
    Census,
}

/// One normalized data point.
///
/// `fields` keeps the remaining provider attributes (FRED realtime bounds,
/// BLS period codes, BEA line descriptions, every Census column).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub series_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub value: Option<String>,
    pub fields: Map<String, Value>,
}

impl Observation {
    /// Value as a number. Missing markers such as FRED's `.` and BEA's
    /// `(NA)` yield `None`; thousands separators are ignored.
    pub fn numeric_value(&self) -> Option<f64> {
        let raw = self.value.as_deref()?.trim().replace(',', "");
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Returns `response[key]` when present, otherwise the whole response.
pub fn parse_response<'a>(response: &'a Value, key: Option<&str>) -> &'a Value {
    key.and_then(|k| response.get(k)).unwrap_or(response)
}

/// Flattens a provider response into observations, in response order.
pub fn extract_series(response: &Value, source: Source) -> Vec<Observation> {
    match source {
        Source::Fred => extract_fred(response),
        Source::Bls => extract_bls(response),
        Source::Bea => extract_bea(response),
        Source::Census => extract_census(response),
    }
}

fn extract_fred(response: &Value) -> Vec<Observation> {
    let Some(observations) = response.get("observations").and_then(Value::as_array) else {
        return Vec::new();
    };
    observations
        .iter()
        .filter_map(Value::as_object)
        .map(|obs| {
            let mut fields = obs.clone();
            let date = take_str(&mut fields, "date");
            let value = take_str(&mut fields, "value");
            Observation {
                series_id: None,
                date: date.as_deref().and_then(parse_iso),
                value,
                fields,
            }
        })
        .collect()
}

fn extract_bls(response: &Value) -> Vec<Observation> {
    let Some(series) = response
        .pointer("/Results/series")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for entry in series {
        let series_id = entry.get("seriesID").and_then(Value::as_str);
        let reference_day = series_id.map(bls_reference_day).unwrap_or(1);
        let data = entry.get("data").and_then(Value::as_array);
        for obs in data.into_iter().flatten().filter_map(Value::as_object) {
            let mut fields = obs.clone();
            let value = take_str(&mut fields, "value");
            let date = match (
                fields.get("year").and_then(Value::as_str),
                fields.get("period").and_then(Value::as_str),
            ) {
                (Some(year), Some(period)) => bls_period_date(year, period, reference_day),
                _ => None,
            };
            out.push(Observation {
                series_id: series_id.map(str::to_string),
                date,
                value,
                fields,
            });
        }
    }
    out
}

fn extract_bea(response: &Value) -> Vec<Observation> {
    let Some(data) = response
        .pointer("/BEAAPI/Results/Data")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    data.iter()
        .filter_map(Value::as_object)
        .map(|item| {
            let mut fields = item.clone();
            let value = take_str(&mut fields, "DataValue");
            let series_id = fields
                .get("SeriesCode")
                .or_else(|| fields.get("TableName"))
                .and_then(Value::as_str)
                .map(str::to_string);
            let date = fields
                .get("TimePeriod")
                .and_then(Value::as_str)
                .and_then(bea_period_date);
            Observation {
                series_id,
                date,
                value,
                fields,
            }
        })
        .collect()
}

/// Census returns a header row followed by data rows; each row becomes one
/// observation whose `fields` maps header names to cells.
fn extract_census(response: &Value) -> Vec<Observation> {
    let Some(rows) = response.as_array() else {
        return Vec::new();
    };
    let Some(headers) = rows.first().and_then(Value::as_array) else {
        return Vec::new();
    };
    rows.iter()
        .skip(1)
        .filter_map(Value::as_array)
        .map(|row| {
            let fields: Map<String, Value> = headers
                .iter()
                .zip(row.iter())
                .filter_map(|(h, cell)| h.as_str().map(|h| (h.to_string(), cell.clone())))
                .collect();
            Observation {
                series_id: None,
                date: None,
                value: None,
                fields,
            }
        })
        .collect()
}

fn take_str(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Establishment survey programs (CES, QCEW) reference the pay period
/// including the 12th of the month.
fn bls_reference_day(series_id: &str) -> u32 {
    if series_id.starts_with("CE") || series_id.starts_with("EN") {
        12
    } else {
        1
    }
}

/// Maps a BLS `year` + `period` pair to a date.
///
/// `M01`-`M12` are months, `Q01`-`Q04` quarters, `S01`/`S02` halves and
/// `A01` the annual value. Annual averages reported as `M13`, `Q05` or `S03`
/// have no single date.
fn bls_period_date(year: &str, period: &str, day: u32) -> Option<NaiveDate> {
    let year: i32 = year.trim().parse().ok()?;
    let code = period.get(..1)?;
    let n: u32 = period.get(1..)?.parse().ok()?;
    let month = match (code, n) {
        ("M", 1..=12) => n,
        ("Q", 1..=4) => (n - 1) * 3 + 1,
        ("S", 1..=2) => (n - 1) * 6 + 1,
        ("A", 1) => 1,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Maps a BEA `TimePeriod` (`2023`, `2023Q2`, `2023M03`) to the first day
/// of the period.
fn bea_period_date(period: &str) -> Option<NaiveDate> {
    let period = period.trim();
    let year: i32 = period.get(..4)?.parse().ok()?;
    let rest = &period[4..];
    let month = if rest.is_empty() {
        1
    } else {
        let n: u32 = rest.get(1..)?.parse().ok()?;
        match (rest.get(..1)?, n) {
            ("Q", 1..=4) => (n - 1) * 3 + 1,
            ("M", 1..=12) => n,
            _ => return None,
        }
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Keeps observations dated within `[start, end]`, both `YYYY-MM-DD`.
/// Undated observations are dropped.
pub fn filter_by_date_range(
    observations: &[Observation],
    start: &str,
    end: &str,
) -> Result<Vec<Observation>, EcoStatsError> {
    let (start, end) = validate_date_range(start, end)?;
    Ok(observations
        .iter()
        .filter(|obs| obs.date.is_some_and(|d| d >= start && d <= end))
        .cloned()
        .collect())
}

/// Numeric values in order, skipping missing or non-numeric entries.
pub fn observation_values(observations: &[Observation]) -> Vec<f64> {
    observations.iter().filter_map(Observation::numeric_value).collect()
}
