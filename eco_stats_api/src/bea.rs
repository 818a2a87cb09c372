//! Bureau of Economic Analysis API client.

use serde_json::Value;

use crate::client::{AuthStyle, Request, RequestExecutor};
use crate::config::ClientConfig;
use crate::query::bea::{validate_frequency, validate_year_spec};
use crate::query::{require_non_empty, BeaDataQuery, Query};
use crate::Error;

pub const BASE_URL: &str = "https://apps.bea.gov/api/data";

const SERVICE: &str = "BEA";

const AUTH: AuthStyle = AuthStyle::QueryParam {
    name: "UserID",
    required: true,
};

/// Client for the BEA data API. Every call is a GET on the base URL with a
/// `method` parameter selecting the operation.
pub struct BeaClient {
    executor: RequestExecutor,
}

impl BeaClient {
    /// Client against the public BEA endpoint.
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

    async fn call(&self, method: &str, params: Vec<(String, String)>) -> Result<Value, Error> {
        let request = Request::get("/")
            .param("method", method)
            .params(params)
            .param("ResultFormat", "JSON");
        let body = self.executor.execute_json(&request).await?;
        check_error(&body)?;
        Ok(body)
    }

    /// Lists the datasets the API serves (`GetDataSetList`).
    pub async fn get_dataset_list(&self) -> Result<Value, Error> {
        self.call("GetDataSetList", Vec::new()).await
    }

    /// Lists the parameters one dataset accepts (`GetParameterList`).
    pub async fn get_parameter_list(&self, dataset: &str) -> Result<Value, Error> {
        require_non_empty("dataset", dataset)?;
        self.call(
            "GetParameterList",
            vec![("datasetname".to_string(), dataset.trim().to_string())],
        )
        .await
    }

    /// Lists the values one parameter of a dataset accepts (`GetParameterValues`).
    pub async fn get_parameter_values(&self, dataset: &str, parameter: &str) -> Result<Value, Error> {
        require_non_empty("dataset", dataset)?;
        require_non_empty("parameter", parameter)?;
        self.call(
            "GetParameterValues",
            vec![
                ("datasetname".to_string(), dataset.trim().to_string()),
                ("ParameterName".to_string(), parameter.trim().to_string()),
            ],
        )
        .await
    }

    /// Fetches data (`GetData`).
    pub async fn get_data(&self, query: &BeaDataQuery) -> Result<Value, Error> {
        query.validate()?;
        self.call("GetData", query.to_query_pairs()).await
    }

    /// National Income and Product Accounts table, e.g. `T10101` for GDP.
    /// Frequency defaults to `A` and year to `X` (all years).
    pub async fn get_nipa_data(
        &self,
        table_name: &str,
        frequency: Option<&str>,
        year: Option<&str>,
    ) -> Result<Value, Error> {
        require_non_empty("table_name", table_name)?;
        let frequency = frequency.unwrap_or("A");
        let year = year.unwrap_or("X");
        validate_frequency(frequency)?;
        validate_year_spec(year)?;
        let query = BeaDataQuery::new("NIPA")
            .with_table_name(table_name)
            .with_frequency(frequency)
            .with_year(year);
        self.get_data(&query).await
    }

    /// Regional accounts table such as `CAINC1`. Year defaults to `LAST5`.
    pub async fn get_regional_data(
        &self,
        table_name: &str,
        line_code: &str,
        geo_fips: &str,
        year: Option<&str>,
    ) -> Result<Value, Error> {
        require_non_empty("table_name", table_name)?;
        require_non_empty("line_code", line_code)?;
        require_non_empty("geo_fips", geo_fips)?;
        let query = BeaDataQuery::new("Regional")
            .with_table_name(table_name)
            .with_year(year.unwrap_or("LAST5"))
            .with_param("LineCode", line_code.trim())
            .with_param("GeoFips", geo_fips.trim());
        self.get_data(&query).await
    }
}

/// Maps an error object inside a 200 body to [`Error::Service`].
///
/// BEA reports failures either at `BEAAPI.Error` or `BEAAPI.Results.Error`.
fn check_error(body: &Value) -> Result<(), Error> {
    let root = &body["BEAAPI"];
    let error = root
        .get("Error")
        .or_else(|| root.get("Results").and_then(|r| r.get("Error")));
    match error {
        Some(error) => {
            let message = error
                .get("APIErrorDescription")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            tracing::error!("BEA returned an error: {}", message);
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
    fn top_level_error_detected() {
        let body = json!({"BEAAPI": {"Error": {"APIErrorCode": "3", "APIErrorDescription": "Invalid UserID"}}});
        match check_error(&body).unwrap_err() {
            Error::Service { service, message } => {
                assert_eq!(service, "BEA");
                assert_eq!(message, "Invalid UserID");
            }
            other => panic!("expected Service, got {:?}", other),
        }
    }

    #[test]
    fn results_error_detected() {
        let body = json!({"BEAAPI": {"Results": {"Error": {"ErrorDetail": {"Description": "bad table"}}}}});
        let err = check_error(&body).unwrap_err();
        assert!(err.to_string().contains("bad table"));
    }

    #[test]
    fn data_passes() {
        let body = json!({"BEAAPI": {"Results": {"Data": []}}});
        assert!(check_error(&body).is_ok());
    }
}
