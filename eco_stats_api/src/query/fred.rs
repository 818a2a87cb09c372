//! Query builders for the FRED `series/observations` and `series/search` endpoints.

use super::common::{
    require_non_empty, validate_code, validate_iso_date, validate_range, Query, SortDirection,
};
use crate::errors::{validation, Error};

/// Data transformations FRED can apply to observations.
pub const UNITS: &[&str] = &["lin", "chg", "ch1", "pch", "pc1", "pca", "cch", "cca", "log"];

/// Frequencies observations can be aggregated to.
pub const FREQUENCIES: &[&str] = &[
    "d", "w", "bw", "m", "q", "sa", "a", "wef", "weth", "wew", "wetu", "wem", "wesu", "wesa",
    "bwew", "bwem",
];

/// Aggregation methods used when `frequency` lowers the native frequency.
pub const AGGREGATION_METHODS: &[&str] = &["avg", "sum", "eop"];

pub const SEARCH_TYPES: &[&str] = &["full_text", "series_id"];

/// Largest `limit` accepted by `series/observations`.
pub const MAX_OBSERVATIONS_LIMIT: u32 = 100_000;
/// Largest `limit` accepted by the search and category endpoints.
pub const MAX_SEARCH_LIMIT: u32 = 1000;

/// Query for `series/observations`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationsQuery {
    pub series_id: String,
    pub observation_start: Option<String>,
    pub observation_end: Option<String>,
    /// Defaults to `lin` (levels, no transformation).
    pub units: String,
    pub frequency: Option<String>,
    /// Defaults to `avg`.
    pub aggregation_method: String,
    /// 1 = observations by real-time period (default), 2-4 = vintage layouts.
    pub output_type: u32,
    pub vintage_dates: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort_order: SortDirection,
}

impl ObservationsQuery {
    pub fn new(series_id: &str) -> Self {
        Self {
            series_id: series_id.to_string(),
            observation_start: None,
            observation_end: None,
            units: "lin".to_string(),
            frequency: None,
            aggregation_method: "avg".to_string(),
            output_type: 1,
            vintage_dates: None,
            limit: None,
            offset: None,
            sort_order: SortDirection::Asc,
        }
    }

    pub fn with_observation_start(mut self, date: &str) -> Self {
        self.observation_start = Some(date.to_string());
        self
    }

    pub fn with_observation_end(mut self, date: &str) -> Self {
        self.observation_end = Some(date.to_string());
        self
    }

    /// Sets both ends of the observation window; `None` leaves an end open.
    pub fn with_range(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.observation_start = start.map(str::to_string);
        self.observation_end = end.map(str::to_string);
        self
    }

    pub fn with_units(mut self, units: &str) -> Self {
        self.units = units.to_string();
        self
    }

    pub fn with_frequency(mut self, frequency: &str) -> Self {
        self.frequency = Some(frequency.to_string());
        self
    }

    pub fn with_aggregation_method(mut self, method: &str) -> Self {
        self.aggregation_method = method.to_string();
        self
    }

    pub fn with_output_type(mut self, output_type: u32) -> Self {
        self.output_type = output_type;
        self
    }

    /// Comma-separated `YYYY-MM-DD` vintage dates for real-time (ALFRED) data.
    pub fn with_vintage_dates(mut self, dates: &str) -> Self {
        self.vintage_dates = Some(dates.to_string());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortDirection) -> Self {
        self.sort_order = sort_order;
        self
    }
}

impl Query for ObservationsQuery {
    fn validate(&self) -> Result<(), Error> {
        require_non_empty("series_id", &self.series_id)?;
        let start = self
            .observation_start
            .as_deref()
            .map(|d| validate_iso_date("observation_start", d))
            .transpose()?;
        let end = self
            .observation_end
            .as_deref()
            .map(|d| validate_iso_date("observation_end", d))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(validation(format!(
                    "observation_start {} is after observation_end {}",
                    start, end
                )));
            }
        }
        validate_code("units", &self.units, UNITS)?;
        if let Some(ref frequency) = self.frequency {
            validate_code("frequency", frequency, FREQUENCIES)?;
        }
        validate_code("aggregation_method", &self.aggregation_method, AGGREGATION_METHODS)?;
        validate_range("output_type", self.output_type, 1, 4)?;
        if let Some(ref vintages) = self.vintage_dates {
            for date in vintages.split(',') {
                validate_iso_date("vintage_dates", date.trim())?;
            }
        }
        if let Some(limit) = self.limit {
            validate_range("limit", limit, 1, MAX_OBSERVATIONS_LIMIT)?;
        }
        Ok(())
    }

    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("series_id".to_string(), self.series_id.trim().to_string()),
            ("units".to_string(), self.units.clone()),
            ("aggregation_method".to_string(), self.aggregation_method.clone()),
            ("output_type".to_string(), self.output_type.to_string()),
            ("sort_order".to_string(), self.sort_order.to_string()),
        ];

        if let Some(ref start) = self.observation_start {
            params.push(("observation_start".to_string(), start.clone()));
        }
        if let Some(ref end) = self.observation_end {
            params.push(("observation_end".to_string(), end.clone()));
        }
        if let Some(ref frequency) = self.frequency {
            params.push(("frequency".to_string(), frequency.clone()));
        }
        if let Some(ref vintages) = self.vintage_dates {
            params.push(("vintage_dates".to_string(), vintages.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }

        params
    }
}

/// Query for `series/search`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSearchQuery {
    pub search_text: String,
    /// `full_text` (default) or `series_id`.
    pub search_type: String,
    pub limit: u32,
    pub offset: u32,
    /// Defaults to `search_rank`.
    pub order_by: String,
    /// Defaults to descending.
    pub sort_order: SortDirection,
}

impl SeriesSearchQuery {
    pub fn new(search_text: &str) -> Self {
        Self {
            search_text: search_text.to_string(),
            search_type: "full_text".to_string(),
            limit: MAX_SEARCH_LIMIT,
            offset: 0,
            order_by: "search_rank".to_string(),
            sort_order: SortDirection::Desc,
        }
    }

    pub fn with_search_type(mut self, search_type: &str) -> Self {
        self.search_type = search_type.to_string();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_order_by(mut self, order_by: &str) -> Self {
        self.order_by = order_by.to_string();
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortDirection) -> Self {
        self.sort_order = sort_order;
        self
    }
}

impl Query for SeriesSearchQuery {
    fn validate(&self) -> Result<(), Error> {
        require_non_empty("search_text", &self.search_text)?;
        validate_code("search_type", &self.search_type, SEARCH_TYPES)?;
        validate_range("limit", self.limit, 1, MAX_SEARCH_LIMIT)?;
        require_non_empty("order_by", &self.order_by)
    }

    fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("search_text".to_string(), self.search_text.clone()),
            ("search_type".to_string(), self.search_type.clone()),
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
            ("order_by".to_string(), self.order_by.clone()),
            ("sort_order".to_string(), self.sort_order.to_string()),
        ]
    }
}
