//! Query builder for Census Data API dataset requests.

use super::common::{require_non_empty, validate_year, Query};
use crate::errors::{validation, Error};

/// Query against one Census dataset.
///
/// `dataset` is either a catalog key (`acs5`, `bds`, ...) or a raw API path
/// (`acs/acs5`). The year is resolved by the client: it becomes part of the
/// URL for year-based datasets and a predicate for timeseries datasets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CensusQuery {
    pub dataset: String,
    /// Variable codes for the `get` clause, e.g. `NAME`, `B01001_001E`.
    pub variables: Vec<String>,
    /// Geography for the `for` clause, e.g. `state:*` or `county:001`.
    pub geo_for: String,
    /// Containing geography for the `in` clause, e.g. `state:06`.
    pub geo_in: Option<String>,
    pub year: Option<String>,
    /// Additional predicates passed through, e.g. `("NAICS2017", "54")`.
    pub predicates: Vec<(String, String)>,
}

impl CensusQuery {
    pub fn new<I, S>(dataset: &str, variables: I, geo_for: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dataset: dataset.to_string(),
            variables: variables.into_iter().map(Into::into).collect(),
            geo_for: geo_for.to_string(),
            ..Self::default()
        }
    }

    pub fn with_geo_in(mut self, geo_in: &str) -> Self {
        self.geo_in = Some(geo_in.to_string());
        self
    }

    pub fn with_year(mut self, year: &str) -> Self {
        self.year = Some(year.to_string());
        self
    }

    pub fn with_predicate(mut self, name: &str, value: &str) -> Self {
        self.predicates.push((name.to_string(), value.to_string()));
        self
    }

    /// Comma-joined variable list for the `get` clause.
    pub fn get_clause(&self) -> String {
        self.variables
            .iter()
            .map(|v| v.trim())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Checks a geography selector of the form `level:code`.
///
/// Levels may contain spaces and slashes (`metropolitan statistical
/// area/micropolitan statistical area:*`); `in` clauses may chain several
/// selectors separated by spaces, so only the presence of a non-empty level
/// and code is enforced.
pub fn validate_geography(field: &str, value: &str) -> Result<(), Error> {
    let trimmed = value.trim();
    match trimmed.rsplit_once(':') {
        Some((level, code)) if !level.trim().is_empty() && !code.trim().is_empty() => Ok(()),
        _ => Err(validation(format!(
            "{} must look like 'level:code' (e.g. 'state:*'), got '{}'",
            field, value
        ))),
    }
}

impl Query for CensusQuery {
    fn validate(&self) -> Result<(), Error> {
        require_non_empty("dataset", &self.dataset)?;
        if self.variables.is_empty() {
            return Err(validation("at least one variable is required"));
        }
        for variable in &self.variables {
            require_non_empty("variable", variable)?;
        }
        validate_geography("geo_for", &self.geo_for)?;
        if let Some(ref geo_in) = self.geo_in {
            validate_geography("geo_in", geo_in)?;
        }
        if let Some(ref year) = self.year {
            validate_year("year", year)?;
        }
        Ok(())
    }

    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("get".to_string(), self.get_clause()),
            ("for".to_string(), self.geo_for.trim().to_string()),
        ];
        if let Some(ref geo_in) = self.geo_in {
            params.push(("in".to_string(), geo_in.trim().to_string()));
        }
        params.extend(self.predicates.iter().cloned());
        params
    }
}

/// What the geocoder returns for each match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnType {
    /// Matched address and coordinates only.
    #[default]
    Locations,
    /// Coordinates plus the census geographies containing them.
    Geographies,
}

impl ReturnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnType::Locations => "locations",
            ReturnType::Geographies => "geographies",
        }
    }
}

pub const DEFAULT_BENCHMARK: &str = "Public_AR_Current";
pub const DEFAULT_VINTAGE: &str = "Current_Current";

/// Address lookup against the Census geocoder.
///
/// Either a one-line `address` or the `street`, `city`, `state`, `zip` parts.
/// A one-line address wins when both are set.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeQuery {
    pub address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub return_type: ReturnType,
    pub benchmark: String,
    /// Only sent with [`ReturnType::Geographies`].
    pub vintage: String,
}

impl Default for GeocodeQuery {
    fn default() -> Self {
        Self {
            address: None,
            street: None,
            city: None,
            state: None,
            zip: None,
            return_type: ReturnType::default(),
            benchmark: DEFAULT_BENCHMARK.to_string(),
            vintage: DEFAULT_VINTAGE.to_string(),
        }
    }
}

impl GeocodeQuery {
    pub fn one_line(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            ..Self::default()
        }
    }

    pub fn parts(street: &str, city: Option<&str>, state: Option<&str>, zip: Option<&str>) -> Self {
        Self {
            street: Some(street.to_string()),
            city: city.map(str::to_string),
            state: state.map(str::to_string),
            zip: zip.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_return_type(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_benchmark(mut self, benchmark: &str) -> Self {
        self.benchmark = benchmark.to_string();
        self
    }

    pub fn with_vintage(mut self, vintage: &str) -> Self {
        self.vintage = vintage.to_string();
        self
    }

    fn one_line_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Path below the geocoder root, e.g. `locations/onelineaddress`.
    pub fn endpoint(&self) -> String {
        let kind = if self.one_line_address().is_some() {
            "onelineaddress"
        } else {
            "address"
        };
        format!("{}/{}", self.return_type.as_str(), kind)
    }
}

impl Query for GeocodeQuery {
    fn validate(&self) -> Result<(), Error> {
        if self.one_line_address().is_none() {
            let street = self.street.as_deref().unwrap_or_default();
            if street.trim().is_empty() {
                return Err(validation("either address or street is required"));
            }
            let has_locality = [&self.city, &self.state, &self.zip]
                .iter()
                .any(|v| v.as_deref().is_some_and(|v| !v.trim().is_empty()));
            if !has_locality {
                return Err(validation("a street address also needs a city, state or zip"));
            }
        }
        require_non_empty("benchmark", &self.benchmark)?;
        if self.return_type == ReturnType::Geographies {
            require_non_empty("vintage", &self.vintage)?;
        }
        Ok(())
    }

    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        match self.one_line_address() {
            Some(address) => params.push(("address".to_string(), address.to_string())),
            None => {
                for (name, value) in [
                    ("street", &self.street),
                    ("city", &self.city),
                    ("state", &self.state),
                    ("zip", &self.zip),
                ] {
                    if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                        params.push((name.to_string(), value.to_string()));
                    }
                }
            }
        }
        params.push(("benchmark".to_string(), self.benchmark.trim().to_string()));
        if self.return_type == ReturnType::Geographies {
            params.push(("vintage".to_string(), self.vintage.trim().to_string()));
        }
        params.push(("format".to_string(), "json".to_string()));
        params
    }
}
