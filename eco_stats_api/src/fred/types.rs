//! Typed views of FRED responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `series/observations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationsResponse {
    pub realtime_start: String,
    pub realtime_end: String,
    #[serde(default)]
    pub observation_start: Option<String>,
    #[serde(default)]
    pub observation_end: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    pub observations: Vec<Observation>,
}

/// One observation. FRED sends values as strings and marks missing ones with `.`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub realtime_start: Option<String>,
    #[serde(default)]
    pub realtime_end: Option<String>,
    pub date: String,
    pub value: String,
}

impl Observation {
    /// The value as a number, `None` for the missing-value marker.
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_observations() {
        let body = r#"{
            "realtime_start": "2024-01-01",
            "realtime_end": "2024-01-01",
            "observation_start": "1600-01-01",
            "observation_end": "9999-12-31",
            "units": "lin",
            "output_type": 1,
            "file_type": "json",
            "order_by": "observation_date",
            "sort_order": "asc",
            "count": 2,
            "offset": 0,
            "limit": 100000,
            "observations": [
                {"realtime_start": "2024-01-01", "realtime_end": "2024-01-01", "date": "2023-01-01", "value": "26813.601"},
                {"realtime_start": "2024-01-01", "realtime_end": "2024-01-01", "date": "2023-04-01", "value": "."}
            ]
        }"#;
        let resp: ObservationsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.count, 2);
        assert_eq!(resp.observations[0].numeric_value(), Some(26813.601));
        assert_eq!(resp.observations[1].numeric_value(), None);
        assert_eq!(
            resp.observations[1].parsed_date(),
            NaiveDate::from_ymd_opt(2023, 4, 1)
        );
    }
}
