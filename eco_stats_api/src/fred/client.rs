//! FRED API client.

use serde_json::Value;

use super::types::ObservationsResponse;
use crate::client::{AuthStyle, Request, RequestExecutor};
use crate::config::ClientConfig;
use crate::query::fred::MAX_SEARCH_LIMIT;
use crate::query::{require_non_empty, validate_range, ObservationsQuery, Query, SeriesSearchQuery};
use crate::Error;

pub const BASE_URL: &str = "https://api.stlouisfed.org/fred";

const SERVICE: &str = "FRED";

const AUTH: AuthStyle = AuthStyle::QueryParam {
    name: "api_key",
    required: true,
};

/// Client for the Federal Reserve Economic Data API. Requires a key.
pub struct FredClient {
    executor: RequestExecutor,
}

impl FredClient {
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

    async fn call(&self, path: &str, params: Vec<(String, String)>) -> Result<Value, Error> {
        let request = Request::get(path).params(params).param("file_type", "json");
        let body = self.executor.execute_json(&request).await?;
        check_error(&body)?;
        Ok(body)
    }

    /// Metadata of one series (`series`).
    pub async fn get_series(&self, series_id: &str) -> Result<Value, Error> {
        require_non_empty("series_id", series_id)?;
        self.call(
            "series",
            vec![("series_id".to_string(), series_id.trim().to_string())],
        )
        .await
    }

    /// Observations of one series (`series/observations`).
    pub async fn get_series_observations(&self, query: &ObservationsQuery) -> Result<Value, Error> {
        query.validate()?;
        self.call("series/observations", query.to_query_pairs())
            .await
    }

    /// Like [`get_series_observations`](Self::get_series_observations), decoded
    /// into [`ObservationsResponse`].
    pub async fn get_observations_typed(
        &self,
        query: &ObservationsQuery,
    ) -> Result<ObservationsResponse, Error> {
        let body = self.get_series_observations(query).await?;
        serde_json::from_value(body).map_err(|e| {
            tracing::error!("Failed to decode FRED observations: {}", e);
            Error::ResponseFormat(e.to_string())
        })
    }

    /// Full-text or series ID search (`series/search`).
    pub async fn search_series(&self, query: &SeriesSearchQuery) -> Result<Value, Error> {
        query.validate()?;
        self.call("series/search", query.to_query_pairs()).await
    }

    /// A category, or the root category when `category_id` is `None`.
    pub async fn get_category(&self, category_id: Option<u32>) -> Result<Value, Error> {
        let params = category_id
            .map(|id| vec![("category_id".to_string(), id.to_string())])
            .unwrap_or_default();
        self.call("category", params).await
    }

    /// Series in a category. `limit` defaults to 1000, `offset` to 0.
    pub async fn get_category_series(
        &self,
        category_id: u32,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, Error> {
        let limit = limit.unwrap_or(MAX_SEARCH_LIMIT);
        validate_range("limit", limit, 1, MAX_SEARCH_LIMIT)?;
        self.call(
            "category/series",
            vec![
                ("category_id".to_string(), category_id.to_string()),
                ("limit".to_string(), limit.to_string()),
                ("offset".to_string(), offset.unwrap_or(0).to_string()),
            ],
        )
        .await
    }

    async fn observe(
        &self,
        series_id: &str,
        units: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Value, Error> {
        let query = ObservationsQuery::new(series_id)
            .with_units(units)
            .with_range(start, end);
        self.get_series_observations(&query).await
    }

    /// Gross domestic product (`GDP`).
    pub async fn get_gdp(&self, start: Option<&str>, end: Option<&str>) -> Result<Value, Error> {
        self.observe("GDP", "lin", start, end).await
    }

    /// Civilian unemployment rate (`UNRATE`).
    pub async fn get_unemployment_rate(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Value, Error> {
        self.observe("UNRATE", "lin", start, end).await
    }

    /// Effective federal funds rate, daily (`DFF`).
    pub async fn get_federal_funds_rate(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Value, Error> {
        self.observe("DFF", "lin", start, end).await
    }

    /// CPI inflation as percent change from a year ago (`CPIAUCSL`, units `pc1`).
    pub async fn get_inflation_rate(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Value, Error> {
        self.observe("CPIAUCSL", "pc1", start, end).await
    }
}

fn check_error(body: &Value) -> Result<(), Error> {
    match body.get("error_message").and_then(Value::as_str) {
        Some(message) => {
            tracing::error!("FRED returned an error: {}", message);
            Err(Error::Service {
                service: SERVICE,
                message: message.to_string(),
            })
        }
        None => Ok(()),
    }
}
