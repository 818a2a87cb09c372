//! BLS Public Data API client.

use serde_json::Value;

use crate::client::{AuthStyle, Request, RequestExecutor};
use crate::config::ClientConfig;
use crate::query::bls::{BlsLimits, V1_LIMITS, V2_LIMITS};
use crate::query::{BlsSeriesQuery, Query};
use crate::Error;

/// Registered (v2) endpoint. Used when an API key is configured.
pub const V2_BASE_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
/// Unregistered (v1) endpoint with lower limits.
pub const V1_BASE_URL: &str = "https://api.bls.gov/publicAPI/v1/timeseries/data/";

pub const UNEMPLOYMENT_RATE: &str = "LNS14000000";
pub const CPI_ALL_ITEMS: &str = "CUUR0000SA0";
pub const TOTAL_NONFARM_EMPLOYMENT: &str = "CES0000000001";
pub const AVERAGE_HOURLY_EARNINGS: &str = "CES0500000003";

const SERVICE: &str = "BLS";

/// Client for BLS time series.
///
/// The key is optional. With one, requests go to v2 with `registrationkey`
/// attached (as a query parameter for GET, in the body for POST) and v2
/// limits apply; without one, v1 limits apply.
pub struct BlsClient {
    executor: RequestExecutor,
    limits: BlsLimits,
}

impl BlsClient {
    /// Client against the public endpoint matching whether a key is given.
    pub fn new(api_key: Option<String>) -> Result<Self, Error> {
        let config = ClientConfig::new(V1_BASE_URL).with_api_key(api_key);
        let base_url = if config.api_key.is_some() {
            V2_BASE_URL
        } else {
            V1_BASE_URL
        };
        Self::with_config(ClientConfig {
            base_url: base_url.to_string(),
            ..config
        })
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let limits = if config.api_key.is_some() {
            V2_LIMITS
        } else {
            V1_LIMITS
        };
        Ok(Self {
            executor: RequestExecutor::new(SERVICE, config, AuthStyle::None)?,
            limits,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    /// Series and year limits in effect for this client.
    pub fn limits(&self) -> BlsLimits {
        self.limits
    }

    pub fn close(&self) -> bool {
        self.executor.close()
    }

    pub fn is_closed(&self) -> bool {
        self.executor.is_closed()
    }

    /// Fetches one or more series.
    ///
    /// A single series is a GET on `{base}/{series_id}`; several series are
    /// sent as one JSON POST.
    pub async fn get_series(&self, query: &BlsSeriesQuery) -> Result<Value, Error> {
        query.validate()?;
        query.check_limits(self.limits)?;

        let key = self.config().api_key.as_deref();
        let request = match query.series_ids.as_slice() {
            [single] => {
                let mut request =
                    Request::get(&format!("/{}", single.trim())).params(query.to_query_pairs());
                if let Some(key) = key {
                    request = request.param("registrationkey", key);
                }
                request
            }
            _ => Request::post_json("/", query.to_payload(key)),
        };

        let body = self.executor.execute_json(&request).await?;
        check_status(&body)?;
        Ok(body)
    }

    async fn get_named(
        &self,
        series_id: &str,
        start_year: Option<&str>,
        end_year: Option<&str>,
    ) -> Result<Value, Error> {
        let query = BlsSeriesQuery::new([series_id]).with_years(start_year, end_year);
        self.get_series(&query).await
    }

    /// Civilian unemployment rate, seasonally adjusted.
    pub async fn get_unemployment_rate(
        &self,
        start_year: Option<&str>,
        end_year: Option<&str>,
    ) -> Result<Value, Error> {
        self.get_named(UNEMPLOYMENT_RATE, start_year, end_year).await
    }

    /// CPI-U, all items, U.S. city average.
    pub async fn get_cpi_all_items(
        &self,
        start_year: Option<&str>,
        end_year: Option<&str>,
    ) -> Result<Value, Error> {
        self.get_named(CPI_ALL_ITEMS, start_year, end_year).await
    }

    /// Total nonfarm employment.
    pub async fn get_employment(
        &self,
        start_year: Option<&str>,
        end_year: Option<&str>,
    ) -> Result<Value, Error> {
        self.get_named(TOTAL_NONFARM_EMPLOYMENT, start_year, end_year)
            .await
    }

    /// Average hourly earnings of all private employees.
    pub async fn get_average_hourly_earnings(
        &self,
        start_year: Option<&str>,
        end_year: Option<&str>,
    ) -> Result<Value, Error> {
        self.get_named(AVERAGE_HOURLY_EARNINGS, start_year, end_year)
            .await
    }
}

/// BLS answers 200 even for failed requests; the outcome is in `status`.
fn check_status(body: &Value) -> Result<(), Error> {
    let status = body.get("status").and_then(Value::as_str);
    if status == Some("REQUEST_SUCCEEDED") {
        return Ok(());
    }

    let messages: Vec<&str> = body
        .get("message")
        .and_then(Value::as_array)
        .map(|m| m.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let message = if messages.is_empty() {
        format!("request status {}", status.unwrap_or("missing"))
    } else {
        messages.join("; ")
    };
    tracing::error!("BLS request not successful: {}", message);
    Err(Error::Service {
        service: SERVICE,
        message,
    })
}
