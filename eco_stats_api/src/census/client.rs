//! Census Data API client.

use serde_json::Value;

use super::catalog::{self, Dataset, DATASETS};
use crate::client::{AuthStyle, Request, RequestExecutor};
use crate::config::ClientConfig;
use crate::errors::validation;
use crate::query::{require_non_empty, validate_year, CensusQuery, Query};
use crate::Error;

pub const BASE_URL: &str = "https://api.census.gov/data";

pub const TOTAL_POPULATION: &str = "B01001_001E";
pub const MEDIAN_HOUSEHOLD_INCOME: &str = "B19013_001E";
pub const POVERTY_RATE_ALL_AGES: &str = "SAEPOVRTALL_PT";

const SERVICE: &str = "Census";

const AUTH: AuthStyle = AuthStyle::QueryParam {
    name: "key",
    required: false,
};

/// Where a dataset lives and how its year is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    path: String,
    year_predicate: Option<(String, String)>,
}

/// Resolves a catalog key or literal path plus optional year to a request path.
fn resolve(dataset: &str, year: Option<&str>) -> Result<Target, Error> {
    let dataset = dataset.trim();
    require_non_empty("dataset", dataset)?;
    if let Some(year) = year {
        validate_year("year", year)?;
    }

    if let Some(info) = catalog::lookup(dataset) {
        if info.timeseries {
            return Ok(Target {
                path: info.path.to_string(),
                year_predicate: year
                    .zip(info.year_param)
                    .map(|(y, p)| (p.to_string(), y.to_string())),
            });
        }
        let year = year.or(info.default_year).ok_or_else(|| {
            validation(format!(
                "year is required for dataset '{}' and no default is configured",
                dataset
            ))
        })?;
        return Ok(Target {
            path: format!("{}/{}", year, info.path),
            year_predicate: None,
        });
    }

    let path = match year {
        Some(year) if !dataset.starts_with("timeseries/") => format!("{}/{}", year, dataset),
        _ => dataset.to_string(),
    };
    Ok(Target {
        path,
        year_predicate: None,
    })
}

/// Client for the Census Data API. The key is optional; anonymous access is
/// rate limited by the Census Bureau.
pub struct CensusClient {
    executor: RequestExecutor,
}

impl CensusClient {
    pub fn new(api_key: Option<String>) -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(BASE_URL).with_api_key(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            executor: RequestExecutor::new(SERVICE, config, AUTH)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    pub fn close(&self) -> bool {
        self.executor.close()
    }

    pub fn is_closed(&self) -> bool {
        self.executor.is_closed()
    }

    async fn call(&self, request: Request) -> Result<Value, Error> {
        let body = self.executor.execute_json(&request).await?;
        check_error(&body)?;
        Ok(body)
    }

    /// Queries any dataset. Returns the API's header row followed by data rows.
    pub async fn get_data(&self, query: &CensusQuery) -> Result<Value, Error> {
        query.validate()?;
        let target = resolve(&query.dataset, query.year.as_deref())?;

        let mut params = query.to_query_pairs();
        if let Some((name, year)) = target.year_predicate {
            if !params.iter().any(|(n, _)| *n == name) {
                params.push((name, year));
            }
        }
        self.call(Request::get(&target.path).params(params)).await
    }

    /// American Community Survey data. `survey` is `acs1` or `acs5`.
    pub async fn get_acs(
        &self,
        variables: &[&str],
        geo_for: &str,
        geo_in: Option<&str>,
        year: Option<&str>,
        survey: &str,
    ) -> Result<Value, Error> {
        if survey != "acs1" && survey != "acs5" {
            return Err(validation(format!(
                "unknown ACS survey '{}'. Valid values: acs1, acs5",
                survey
            )));
        }
        let mut query = CensusQuery::new(survey, variables.iter().copied(), geo_for);
        query.geo_in = geo_in.map(str::to_string);
        query.year = year.map(str::to_string);
        self.get_data(&query).await
    }

    /// Total population from the ACS.
    pub async fn get_population(
        &self,
        geo_for: &str,
        geo_in: Option<&str>,
        year: Option<&str>,
        survey: &str,
    ) -> Result<Value, Error> {
        self.get_acs(&["NAME", TOTAL_POPULATION], geo_for, geo_in, year, survey)
            .await
    }

    /// Median household income from the ACS.
    pub async fn get_median_income(
        &self,
        geo_for: &str,
        geo_in: Option<&str>,
        year: Option<&str>,
        survey: &str,
    ) -> Result<Value, Error> {
        self.get_acs(&["NAME", MEDIAN_HOUSEHOLD_INCOME], geo_for, geo_in, year, survey)
            .await
    }

    /// Small Area Income and Poverty Estimates. Defaults to the all-ages poverty rate.
    pub async fn get_poverty(
        &self,
        variables: Option<&[&str]>,
        geo_for: &str,
        geo_in: Option<&str>,
        year: Option<&str>,
    ) -> Result<Value, Error> {
        let variables = variables.unwrap_or(&["NAME", POVERTY_RATE_ALL_AGES]);
        let mut query = CensusQuery::new("saipe", variables.iter().copied(), geo_for);
        query.geo_in = geo_in.map(str::to_string);
        query.year = year.map(str::to_string);
        self.get_data(&query).await
    }

    /// Variable metadata of a dataset (`variables.json`).
    pub async fn get_variables(&self, dataset: &str, year: Option<&str>) -> Result<Value, Error> {
        let target = resolve(dataset, year)?;
        self.call(Request::get(&format!("{}/variables.json", target.path)))
            .await
    }

    /// Geography levels a dataset supports (`geography.json`).
    pub async fn get_geographies(&self, dataset: &str, year: Option<&str>) -> Result<Value, Error> {
        let target = resolve(dataset, year)?;
        self.call(Request::get(&format!("{}/geography.json", target.path)))
            .await
    }

    /// The built-in dataset catalog. No request is made.
    pub fn list_datasets(&self) -> &'static [Dataset] {
        DATASETS
    }
}

fn check_error(body: &Value) -> Result<(), Error> {
    match body.get("error") {
        Some(error) => {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            tracing::error!("Census returned an error: {}", message);
            Err(Error::Service {
                service: SERVICE,
                message,
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vintage_dataset_uses_year_or_default() {
        let t = resolve("acs5", Some("2021")).unwrap();
        assert_eq!(t.path, "2021/acs/acs5");
        assert_eq!(t.year_predicate, None);

        let t = resolve("acs5", None).unwrap();
        assert_eq!(t.path, "2023/acs/acs5");
    }

    #[test]
    fn timeseries_dataset_moves_year_to_predicate() {
        let t = resolve("bds", Some("2020")).unwrap();
        assert_eq!(t.path, "timeseries/bds");
        assert_eq!(t.year_predicate, Some(("YEAR".to_string(), "2020".to_string())));

        let t = resolve("qwi/sa", None).unwrap();
        assert_eq!(t.path, "timeseries/qwi/sa");
        assert_eq!(t.year_predicate, None);
    }

    #[test]
    fn literal_paths() {
        assert_eq!(resolve("acs/acs1/subject", Some("2022")).unwrap().path, "2022/acs/acs1/subject");
        assert_eq!(resolve("timeseries/eits/resconst", Some("2022")).unwrap().path, "timeseries/eits/resconst");
        assert_eq!(resolve("timeseries/intltrade", None).unwrap().path, "timeseries/intltrade");
    }

    #[test]
    fn bad_year_rejected() {
        assert!(resolve("acs5", Some("23")).unwrap_err().is_validation());
        assert!(resolve("  ", None).is_err());
    }

    #[test]
    fn in_body_error() {
        let err = check_error(&json!({"error": "unknown variable 'XYZ'"})).unwrap_err();
        assert!(matches!(err, Error::Service { service: "Census", .. }));
        assert!(check_error(&json!([["NAME"], ["California"]])).is_ok());
    }
}
