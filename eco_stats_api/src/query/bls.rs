//! Query builder for the BLS Public Data API `timeseries/data` endpoint.

use chrono::{Datelike, Utc};
use serde_json::{json, Map, Value};

use super::common::{validate_year, Query};
use crate::errors::{validation, Error};

/// Per-request limits of one BLS API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlsLimits {
    pub max_series: usize,
    pub max_years: u16,
}

/// Limits for registered (v2) access.
pub const V2_LIMITS: BlsLimits = BlsLimits {
    max_series: 50,
    max_years: 20,
};

/// Limits for unregistered (v1) access.
pub const V1_LIMITS: BlsLimits = BlsLimits {
    max_series: 25,
    max_years: 10,
};

/// Query for one or more BLS series.
///
/// A single series can be fetched with GET and query parameters; several
/// series need the JSON POST payload from [`to_payload`](Self::to_payload).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlsSeriesQuery {
    pub series_ids: Vec<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub catalog: bool,
    pub calculations: bool,
    pub annual_average: bool,
    pub aspects: bool,
}

impl BlsSeriesQuery {
    pub fn new<I, S>(series_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            series_ids: series_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_years(mut self, start_year: Option<&str>, end_year: Option<&str>) -> Self {
        self.start_year = start_year.map(str::to_string);
        self.end_year = end_year.map(str::to_string);
        self
    }

    pub fn with_catalog(mut self, catalog: bool) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_calculations(mut self, calculations: bool) -> Self {
        self.calculations = calculations;
        self
    }

    pub fn with_annual_average(mut self, annual_average: bool) -> Self {
        self.annual_average = annual_average;
        self
    }

    pub fn with_aspects(mut self, aspects: bool) -> Self {
        self.aspects = aspects;
        self
    }

    /// Checks the series count and year span against one API version's limits.
    ///
    /// A missing end year is counted up to the current year, which is what
    /// the service substitutes.
    pub fn check_limits(&self, limits: BlsLimits) -> Result<(), Error> {
        let current_year = u16::try_from(Utc::now().year()).unwrap_or(u16::MAX);
        self.check_limits_as_of(limits, current_year)
    }

    /// [`check_limits`](Self::check_limits) with an explicit current year.
    pub fn check_limits_as_of(&self, limits: BlsLimits, current_year: u16) -> Result<(), Error> {
        if self.series_ids.len() > limits.max_series {
            return Err(validation(format!(
                "at most {} series may be requested at once, got {}",
                limits.max_series,
                self.series_ids.len()
            )));
        }
        if let Some(start) = &self.start_year {
            let start = validate_year("start_year", start)?;
            let end = match &self.end_year {
                Some(end) => validate_year("end_year", end)?,
                None => current_year,
            };
            let span = end.saturating_sub(start) + 1;
            if span > limits.max_years {
                return Err(validation(format!(
                    "at most {} years may be requested at once, got {}",
                    limits.max_years, span
                )));
            }
        }
        Ok(())
    }

    /// JSON body for the multi-series POST request.
    pub fn to_payload(&self, registration_key: Option<&str>) -> Value {
        let mut payload = Map::new();
        payload.insert("seriesid".to_string(), json!(self.series_ids));
        if let Some(key) = registration_key {
            payload.insert("registrationkey".to_string(), json!(key));
        }
        if let Some(ref start) = self.start_year {
            payload.insert("startyear".to_string(), json!(start));
        }
        if let Some(ref end) = self.end_year {
            payload.insert("endyear".to_string(), json!(end));
        }
        for (name, flag) in self.flags() {
            if flag {
                payload.insert(name.to_string(), json!(true));
            }
        }
        Value::Object(payload)
    }

    fn flags(&self) -> [(&'static str, bool); 4] {
        [
            ("catalog", self.catalog),
            ("calculations", self.calculations),
            ("annualaverage", self.annual_average),
            ("aspects", self.aspects),
        ]
    }
}

impl Query for BlsSeriesQuery {
    fn validate(&self) -> Result<(), Error> {
        if self.series_ids.is_empty() {
            return Err(validation("at least one series ID is required"));
        }
        for id in &self.series_ids {
            if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
                return Err(validation(format!(
                    "BLS series ID '{}' must be non-empty and alphanumeric",
                    id
                )));
            }
        }
        let start = self
            .start_year
            .as_deref()
            .map(|y| validate_year("start_year", y))
            .transpose()?;
        let end = self
            .end_year
            .as_deref()
            .map(|y| validate_year("end_year", y))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(validation(format!(
                    "start_year {} is after end_year {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Parameters for the single-series GET form (series ID goes in the path).
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ref start) = self.start_year {
            params.push(("startyear".to_string(), start.clone()));
        }
        if let Some(ref end) = self.end_year {
            params.push(("endyear".to_string(), end.clone()));
        }
        for (name, flag) in self.flags() {
            if flag {
                params.push((name.to_string(), "true".to_string()));
            }
        }
        params
    }
}
