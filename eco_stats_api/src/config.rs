//! Per-client configuration: endpoint, credentials, timeout and retry budget.

use std::time::Duration;

use url::Url;

use crate::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default delay before the first retry. Doubles on every further retry.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
/// Upper bound for a single retry delay.
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

/// Connection settings for one service client.
///
/// Built once at startup and handed to a client, which keeps its own copy.
/// Nothing here is read from the process environment; see the library
/// crate's `EcoStatsConfig` for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// API key, if the service has one.
    pub api_key: Option<String>,
    /// Timeout applied to each individual attempt.
    pub timeout: Duration,
    /// Retries allowed after the first attempt. Zero means a single attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub retry_base_delay: Duration,
    /// Cap on any single retry delay.
    pub retry_max_delay: Duration,
}

impl ClientConfig {
    /// Creates a configuration for `base_url` with default timeout and retries.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            retry_max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }

    /// Sets the API key. Empty keys are treated as absent.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff schedule. A zero base delay disables waiting between attempts.
    pub fn with_retry_delays(mut self, base: Duration, max: Duration) -> Self {
        self.retry_base_delay = base;
        self.retry_max_delay = max;
        self
    }

    /// Checks the invariants a client relies on before any request is made.
    pub fn validate(&self) -> Result<(), Error> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(Error::InvalidConfig("base URL must not be empty".to_string()));
        }
        let parsed = Url::parse(base)
            .map_err(|e| Error::InvalidConfig(format!("invalid base URL '{}': {}", base, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Delay to wait after the given failed attempt (1-indexed).
    ///
    /// Exponential in the attempt number, capped at `retry_max_delay`, then
    /// scaled by `jitter` (expected in `0.8..1.2`).
    pub fn retry_delay(&self, attempt: u32, jitter: f64) -> Duration {
        let shift = attempt.saturating_sub(1).min(30);
        let base_ms = self.retry_base_delay.as_millis() as u64;
        let capped = base_ms
            .saturating_mul(1u64 << shift)
            .min(self.retry_max_delay.as_millis() as u64);
        Duration::from_millis((capped as f64 * jitter) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ClientConfig::new("https://api.example.gov");
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.max_retries, 3);
        assert!(cfg.api_key.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_key_is_absent() {
        let cfg = ClientConfig::new("https://x.gov").with_api_key(Some("  ".to_string()));
        assert!(cfg.api_key.is_none());
        let cfg = ClientConfig::new("https://x.gov").with_api_key(Some("k".to_string()));
        assert_eq!(cfg.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            ClientConfig::new("").validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ClientConfig::new("not a url").validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ClientConfig::new("ftp://x.gov").validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg = ClientConfig::new("https://x.gov").with_timeout(Duration::ZERO);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn retry_delay_doubles_and_caps() {
        let cfg = ClientConfig::new("https://x.gov")
            .with_retry_delays(Duration::from_millis(100), Duration::from_millis(350));
        assert_eq!(cfg.retry_delay(1, 1.0), Duration::from_millis(100));
        assert_eq!(cfg.retry_delay(2, 1.0), Duration::from_millis(200));
        assert_eq!(cfg.retry_delay(3, 1.0), Duration::from_millis(350));
        assert_eq!(cfg.retry_delay(40, 1.0), Duration::from_millis(350));
    }

    #[test]
    fn zero_base_delay_never_waits() {
        let cfg = ClientConfig::new("https://x.gov")
            .with_retry_delays(Duration::ZERO, Duration::from_secs(5));
        assert_eq!(cfg.retry_delay(3, 1.19), Duration::ZERO);
    }
}
