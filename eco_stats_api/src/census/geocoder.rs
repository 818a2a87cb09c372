//! Census geocoder: address to coordinates and containing geographies.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::client::{AuthStyle, Request, RequestExecutor};
use crate::config::ClientConfig;
use crate::query::{GeocodeQuery, Query, ReturnType};
use crate::Error;

pub const GEOCODER_URL: &str = "https://geocoding.geo.census.gov/geocoder";

const SERVICE: &str = "Census";

/// One candidate match for a geocoded address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressMatch {
    pub matched_address: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub tiger_line_id: Option<String>,
    pub side: Option<String>,
    /// Flattened geography attributes, e.g. `state_geoid`, `census_tract_name`.
    /// Empty unless geographies were requested.
    pub geographies: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    result: GeocodeResult,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(rename = "addressMatches", default)]
    address_matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    #[serde(rename = "matchedAddress", default)]
    matched_address: String,
    coordinates: Option<Coordinates>,
    #[serde(rename = "tigerLine")]
    tiger_line: Option<TigerLine>,
    #[serde(default)]
    geographies: BTreeMap<String, Vec<BTreeMap<String, Value>>>,
}

#[derive(Debug, Deserialize)]
struct Coordinates {
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TigerLine {
    #[serde(rename = "tigerLineId")]
    tiger_line_id: Option<String>,
    side: Option<String>,
}

impl From<RawMatch> for AddressMatch {
    fn from(raw: RawMatch) -> Self {
        let (longitude, latitude) = raw
            .coordinates
            .map(|c| (c.x, c.y))
            .unwrap_or_default();
        let (tiger_line_id, side) = raw
            .tiger_line
            .map(|t| (t.tiger_line_id, t.side))
            .unwrap_or_default();
        Self {
            matched_address: raw.matched_address,
            longitude,
            latitude,
            tiger_line_id,
            side,
            geographies: flatten_geographies(&raw.geographies),
        }
    }
}

/// `"Census Tracts"` becomes `census_tract`, `"Counties"` becomes `county`.
fn layer_prefix(layer: &str) -> String {
    let name = layer.trim().to_lowercase().replace(' ', "_");
    if let Some(stem) = name.strip_suffix("ies") {
        format!("{}y", stem)
    } else {
        name.strip_suffix('s').unwrap_or(&name).to_string()
    }
}

/// Takes the first feature of each layer; its attributes become
/// `{layer}_{attribute}` columns with lowercased attribute names.
fn flatten_geographies(
    layers: &BTreeMap<String, Vec<BTreeMap<String, Value>>>,
) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    for (layer, features) in layers {
        let Some(first) = features.first() else {
            continue;
        };
        let prefix = layer_prefix(layer);
        for (key, value) in first {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => continue,
                other => other.to_string(),
            };
            flat.insert(format!("{}_{}", prefix, key.to_lowercase()), text);
        }
    }
    flat
}

/// Client for the Census geocoder. No key is involved.
pub struct GeocoderClient {
    executor: RequestExecutor,
}

impl GeocoderClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(GEOCODER_URL))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            executor: RequestExecutor::new(SERVICE, config, AuthStyle::None)?,
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

    /// Raw geocoder response.
    pub async fn geocode_raw(&self, query: &GeocodeQuery) -> Result<Value, Error> {
        query.validate()?;
        let request = Request::get(&query.endpoint()).params(query.to_query_pairs());
        let body = self.executor.execute_json(&request).await?;
        check_errors(&body)?;
        Ok(body)
    }

    /// Candidate matches, best first. No match is an empty list.
    pub async fn geocode(&self, query: &GeocodeQuery) -> Result<Vec<AddressMatch>, Error> {
        let body = self.geocode_raw(query).await?;
        let response: GeocodeResponse = serde_json::from_value(body).map_err(|e| {
            tracing::error!("Failed to decode geocoder response: {}", e);
            Error::ResponseFormat(format!("unexpected geocoder response: {}", e))
        })?;
        Ok(response
            .result
            .address_matches
            .into_iter()
            .map(AddressMatch::from)
            .collect())
    }

    /// Geocodes a one-line address with the containing geographies.
    pub async fn geocode_address(&self, address: &str) -> Result<Vec<AddressMatch>, Error> {
        let query = GeocodeQuery::one_line(address).with_return_type(ReturnType::Geographies);
        self.geocode(&query).await
    }
}

fn check_errors(body: &Value) -> Result<(), Error> {
    let Some(errors) = body.get("errors") else {
        return Ok(());
    };
    let message = match errors {
        Value::Array(items) => items
            .iter()
            .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    };
    tracing::error!("Census geocoder returned an error: {}", message);
    Err(Error::Service {
        service: SERVICE,
        message,
    })
}
