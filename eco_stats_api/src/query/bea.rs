//! Query builder for the BEA `GetData` method.

use super::common::{require_non_empty, validate_year, Query};
use crate::errors::{validation, Error};

/// Frequency codes BEA accepts: annual, quarterly, monthly.
pub const FREQUENCIES: &[&str] = &["A", "Q", "M"];

/// Query for BEA `GetData`. `UserID`, `method` and `ResultFormat` are added
/// by the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeaDataQuery {
    pub dataset: String,
    pub table_name: Option<String>,
    /// One or more of `A`, `Q`, `M`, comma-separated.
    pub frequency: Option<String>,
    /// `X` or `ALL` for every year, `LAST5`-style relative ranges, or
    /// comma-separated 4-digit years.
    pub year: Option<String>,
    /// Dataset-specific parameters such as `LineCode` or `GeoFips`.
    pub extra: Vec<(String, String)>,
}

impl BeaDataQuery {
    pub fn new(dataset: &str) -> Self {
        Self {
            dataset: dataset.to_string(),
            ..Self::default()
        }
    }

    pub fn with_table_name(mut self, table_name: &str) -> Self {
        self.table_name = Some(table_name.to_string());
        self
    }

    pub fn with_frequency(mut self, frequency: &str) -> Self {
        self.frequency = Some(frequency.to_string());
        self
    }

    pub fn with_year(mut self, year: &str) -> Self {
        self.year = Some(year.to_string());
        self
    }

    /// Adds a dataset-specific parameter, e.g. `("LineCode", "1")`.
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.extra.push((name.to_string(), value.to_string()));
        self
    }
}

/// Checks a BEA `Frequency` value such as `Q` or `A,Q`.
pub fn validate_frequency(value: &str) -> Result<(), Error> {
    for code in value.split(',') {
        let code = code.trim();
        if !FREQUENCIES.contains(&code) {
            return Err(validation(format!(
                "unknown BEA frequency '{}'. Valid values: A, Q, M",
                code
            )));
        }
    }
    Ok(())
}

/// Checks a BEA `Year` value: `X`, `ALL`, `LAST<n>`, or 4-digit years.
pub fn validate_year_spec(value: &str) -> Result<(), Error> {
    let upper = value.trim().to_uppercase();
    if upper == "X" || upper == "ALL" {
        return Ok(());
    }
    if let Some(n) = upper.strip_prefix("LAST") {
        if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(());
        }
        return Err(validation(format!(
            "BEA year '{}' must be LAST followed by a number, e.g. LAST5",
            value
        )));
    }
    for year in upper.split(',') {
        validate_year("year", year.trim())?;
    }
    Ok(())
}

impl Query for BeaDataQuery {
    fn validate(&self) -> Result<(), Error> {
        require_non_empty("dataset", &self.dataset)?;
        if let Some(ref table) = self.table_name {
            require_non_empty("table_name", table)?;
        }
        if let Some(ref frequency) = self.frequency {
            validate_frequency(frequency)?;
        }
        if let Some(ref year) = self.year {
            validate_year_spec(year)?;
        }
        for (name, _) in &self.extra {
            require_non_empty("parameter name", name)?;
        }
        Ok(())
    }

    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut params = vec![("datasetname".to_string(), self.dataset.trim().to_string())];

        if let Some(ref table) = self.table_name {
            params.push(("TableName".to_string(), table.clone()));
        }
        if let Some(ref frequency) = self.frequency {
            params.push(("Frequency".to_string(), frequency.clone()));
        }
        if let Some(ref year) = self.year {
            params.push(("Year".to_string(), year.clone()));
        }
        params.extend(self.extra.iter().cloned());

        params
    }
}
