//! The seam between the request executor and the network.
//!
//! [`HttpTransport`] is the production implementation on top of a single,
//! reused `reqwest::Client`. Anything else implementing [`Transport`] can be
//! plugged into the executor, which is how the retry logic is tested without
//! a server.

use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::Error;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP method of an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A fully resolved request: absolute URL with query string, headers, optional JSON body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

/// Status code and body text of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A failure below the HTTP layer: connect error, timeout, broken body stream.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        // The URL carries the API key as a query parameter.
        let e = e.without_url();
        if e.is_timeout() {
            TransportError(format!("timed out: {}", e))
        } else if e.is_connect() {
            TransportError(format!("connection failed: {}", e))
        } else {
            TransportError(e.to_string())
        }
    }
}

/// Sends one HTTP request and returns whatever the server answered.
///
/// Implementations must not retry or interpret status codes; the executor
/// owns both. A transport is reused for every request of a client and is
/// dropped when the client is closed.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport holding a connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the underlying client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::InvalidConfig(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(request.url.clone()),
            Method::Post => self.client.post(request.url.clone()),
        };
        if !request
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("accept"))
        {
            builder = builder.header("accept", "application/json");
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connection_error_omits_url() {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let request = HttpRequest {
            method: Method::Get,
            url: Url::parse("http://127.0.0.1:1/fred/series?series_id=GDP&api_key=SUPERSECRETKEY")
                .unwrap(),
            headers: Vec::new(),
            body: None,
        };
        let err = transport.send(&request).await.unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETKEY"), "{}", err);
        assert!(!err.to_string().contains("127.0.0.1:1"), "{}", err);
    }
}
