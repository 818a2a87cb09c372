//! Shared request executor used by every service client.

use std::sync::{Arc, Mutex};

use rand::Rng;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    config::ClientConfig,
    transport::{HttpRequest, HttpTransport, Method, RawResponse, Transport},
    Error,
};

/// How a service expects its API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// The executor never attaches the key; the service client handles it.
    None,
    /// Key sent as a query parameter, e.g. `api_key=...`.
    QueryParam { name: &'static str, required: bool },
    /// Key sent as a header value, `prefix` prepended.
    Header {
        name: &'static str,
        prefix: &'static str,
        required: bool,
    },
}

impl AuthStyle {
    fn required(&self) -> bool {
        match self {
            AuthStyle::None => false,
            AuthStyle::QueryParam { required, .. } | AuthStyle::Header { required, .. } => {
                *required
            }
        }
    }
}

/// A single request: method, path below the base URL, ordered query pairs.
///
/// Built per call by the service clients and discarded afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::Get,
            path: path.to_string(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(path: &str, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.to_string(),
            params: Vec::new(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends one query pair.
    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds a request header. The API key header, if any, is added by the executor.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Appends query pairs in order.
    pub fn params<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.params.extend(pairs);
        self
    }
}

/// Issues requests against one configured base URL, retrying transient failures.
///
/// Retryable outcomes are transport errors, HTTP 429 and HTTP 5xx. They are
/// retried up to `max_retries` times with an exponential, jittered delay
/// (see [`ClientConfig::retry_delay`]); when the budget runs out the result
/// is [`Error::Network`]. Any other non-success status fails immediately
/// with [`Error::HttpStatus`].
///
/// The transport (and with it the connection pool) is created once and
/// reused until [`close`](Self::close) is called or the executor is dropped.
/// An executor may be shared between tasks, but requests are not coordinated:
/// callers that need ordering must serialize their own calls.
pub struct RequestExecutor<T: Transport = HttpTransport> {
    service: &'static str,
    config: ClientConfig,
    base_url: Url,
    auth: AuthStyle,
    transport: Mutex<Option<Arc<T>>>,
}

impl RequestExecutor<HttpTransport> {
    /// Validates `config` and builds a `reqwest`-backed executor.
    pub fn new(service: &'static str, config: ClientConfig, auth: AuthStyle) -> Result<Self, Error> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout)?;
        Self::with_transport(service, config, auth, transport)
    }
}

impl<T: Transport> RequestExecutor<T> {
    /// Builds an executor over a caller-provided transport.
    pub fn with_transport(
        service: &'static str,
        config: ClientConfig,
        auth: AuthStyle,
        transport: T,
    ) -> Result<Self, Error> {
        config.validate()?;
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| Error::InvalidConfig(format!("invalid base URL: {}", e)))?;
        Ok(Self {
            service,
            config,
            base_url,
            auth,
            transport: Mutex::new(Some(Arc::new(transport))),
        })
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Releases the transport. Returns `true` only for the call that released it.
    pub fn close(&self) -> bool {
        let released = self
            .transport
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .is_some();
        if released {
            tracing::debug!("{} client closed", self.service);
        }
        released
    }

    pub fn is_closed(&self) -> bool {
        self.transport
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    fn transport(&self) -> Result<Arc<T>, Error> {
        self.transport
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(Error::Closed {
                service: self.service,
            })
    }

    fn resolve(&self, request: &Request) -> Result<HttpRequest, Error> {
        let path = request.path.trim();
        if path.is_empty() {
            return Err(Error::Validation("request path must not be empty".to_string()));
        }

        let key = self.config.api_key.as_deref();
        if self.auth.required() && key.is_none() {
            return Err(Error::MissingApiKey {
                service: self.service,
            });
        }

        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|e| {
            tracing::error!("Invalid URL constructed for {}: {}", self.service, e);
            Error::Validation(format!("invalid request path '{}': {}", path, e))
        })?;

        let mut headers = request.headers.clone();
        let mut pairs: Vec<(&str, &str)> = request
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        match (self.auth, key) {
            (AuthStyle::QueryParam { name, .. }, Some(key)) => pairs.push((name, key)),
            (AuthStyle::Header { name, prefix, .. }, Some(key)) => {
                headers.push((name.to_string(), format!("{}{}", prefix, key)));
            }
            _ => {}
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(HttpRequest {
            method: request.method,
            url,
            headers,
            body: request.body.clone(),
        })
    }

    /// Masks the API key in text that may be logged or returned to the caller.
    fn redact(&self, text: String) -> String {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() && text.contains(key) => text.replace(key, "[REDACTED]"),
            _ => text,
        }
    }

    /// Executes `request` and returns the body of the first successful response.
    pub async fn execute_raw(&self, request: &Request) -> Result<String, Error> {
        let http_request = self.resolve(request)?;
        let transport = self.transport()?;
        let max_attempts = self.config.max_retries.saturating_add(1);

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            tracing::debug!(
                "{} {} {} (attempt {}/{})",
                self.service,
                request.method,
                http_request.url.path(),
                attempt,
                max_attempts
            );

            let failure = match transport.send(&http_request).await {
                Ok(resp) if resp.is_success() => return Ok(resp.body),
                Ok(resp) if is_retryable_status(resp.status) => self.redact(describe(&resp)),
                Ok(resp) => {
                    let snippet = self.redact(truncate_body(&resp.body));
                    tracing::error!(
                        "{} request to {} failed with status {}: {}",
                        self.service,
                        http_request.url.path(),
                        resp.status,
                        snippet
                    );
                    return Err(Error::HttpStatus {
                        status: resp.status,
                        body: snippet,
                    });
                }
                Err(e) => self.redact(e.to_string()),
            };

            if attempt >= max_attempts {
                tracing::error!(
                    "{} request to {} gave up after {} attempt(s): {}",
                    self.service,
                    http_request.url.path(),
                    attempt,
                    failure
                );
                return Err(Error::Network {
                    attempts: attempt,
                    message: failure,
                });
            }

            let delay = self.config.retry_delay(attempt, jitter());
            tracing::warn!(
                "{} request failed (attempt {}/{}), retrying in {:.1}s: {}",
                self.service,
                attempt,
                max_attempts,
                delay.as_secs_f64(),
                failure
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Executes `request` and deserializes the body into `R`.
    pub async fn execute<R: DeserializeOwned>(&self, request: &Request) -> Result<R, Error> {
        let body = self.execute_raw(request).await?;
        serde_json::from_str::<R>(&body).map_err(|e| {
            let snippet = self.redact(truncate_body(&body));
            tracing::error!("Failed to parse {} response: {} | body: {}", self.service, e, snippet);
            Error::ResponseFormat(format!("{}: {}", e, snippet))
        })
    }

    /// Executes `request` and returns the body as untyped JSON.
    pub async fn execute_json(&self, request: &Request) -> Result<serde_json::Value, Error> {
        self.execute::<serde_json::Value>(request).await
    }
}

impl<T: Transport> Drop for RequestExecutor<T> {
    fn drop(&mut self) {
        self.close();
    }
}

fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

fn describe(resp: &RawResponse) -> String {
    format!("HTTP {}: {}", resp.status, truncate_body(&resp.body))
}

fn jitter() -> f64 {
    rand::thread_rng().gen_range(0.8..1.2)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
