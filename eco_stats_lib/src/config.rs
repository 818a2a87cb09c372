//! Environment-driven configuration for the facade.
//!
//! Built once at startup and passed to [`EcoStats::new`](crate::EcoStats::new).
//! Nothing here is read lazily or cached globally.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use eco_stats_api::{bea, bls, census, fred, ClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};

use crate::error::EcoStatsError;

pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// The statistical services the library talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Bea,
    Bls,
    Census,
    Fred,
}

impl Service {
    pub const ALL: [Service; 4] = [Service::Bea, Service::Bls, Service::Census, Service::Fred];

    pub fn name(&self) -> &'static str {
        match self {
            Service::Bea => "BEA",
            Service::Bls => "BLS",
            Service::Census => "Census",
            Service::Fred => "FRED",
        }
    }

    /// Whether the service refuses requests without a key.
    pub fn requires_key(&self) -> bool {
        matches!(self, Service::Bea | Service::Fred)
    }

    fn env_prefix(&self) -> &'static str {
        match self {
            Service::Bea => "BEA",
            Service::Bls => "BLS",
            Service::Census => "CENSUS",
            Service::Fred => "FRED",
        }
    }

    /// Name of the variable holding the API key, e.g. `FRED_API_KEY`.
    pub fn key_var(&self) -> String {
        format!("{}_API_KEY", self.env_prefix())
    }

    /// Name of the variable overriding the base URL, e.g. `FRED_BASE_URL`.
    pub fn base_url_var(&self) -> String {
        format!("{}_BASE_URL", self.env_prefix())
    }

    /// Public endpoint. BLS has a registered (v2) and an anonymous (v1) endpoint.
    pub fn default_base_url(&self, has_key: bool) -> &'static str {
        match self {
            Service::Bea => bea::BASE_URL,
            Service::Bls if has_key => bls::client::V2_BASE_URL,
            Service::Bls => bls::client::V1_BASE_URL,
            Service::Census => census::client::BASE_URL,
            Service::Fred => fred::client::BASE_URL,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key and endpoint for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Settings for every service plus the shared timeout, retry budget and cache location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcoStatsConfig {
    pub bea: ServiceSettings,
    pub bls: ServiceSettings,
    pub census: ServiceSettings,
    pub fred: ServiceSettings,
    /// BLS flat-file tree (`BLS_FLAT_FILE_BASE_URL`).
    pub bls_flat_file_url: String,
    /// QCEW open-data slices (`QCEW_BASE_URL`).
    pub qcew_url: String,
    /// Census geocoder (`CENSUS_GEOCODER_BASE_URL`).
    pub geocoder_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub cache_dir: PathBuf,
}

impl EcoStatsConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, EcoStatsError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset. `API_TIMEOUT` (seconds) and
    /// `API_MAX_RETRIES` must be non-negative integers when set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EcoStatsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let service = |s: Service| {
            let api_key = get(&s.key_var());
            let base_url = get(&s.base_url_var())
                .unwrap_or_else(|| s.default_base_url(api_key.is_some()).to_string());
            ServiceSettings { api_key, base_url }
        };

        let timeout = match get("API_TIMEOUT") {
            Some(raw) => {
                let secs = parse_number::<u64>("API_TIMEOUT", &raw)?;
                if secs == 0 {
                    return Err(EcoStatsError::Config(
                        "API_TIMEOUT must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };
        let max_retries = match get("API_MAX_RETRIES") {
            Some(raw) => parse_number::<u32>("API_MAX_RETRIES", &raw)?,
            None => DEFAULT_MAX_RETRIES,
        };
        let cache_dir = get("ECO_STATS_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));

        let url = |var: &str, default: &str| get(var).unwrap_or_else(|| default.to_string());

        Ok(Self {
            bea: service(Service::Bea),
            bls: service(Service::Bls),
            census: service(Service::Census),
            fred: service(Service::Fred),
            bls_flat_file_url: url("BLS_FLAT_FILE_BASE_URL", bls::flat_files::BASE_URL),
            qcew_url: url("QCEW_BASE_URL", bls::qcew::BASE_URL),
            geocoder_url: url("CENSUS_GEOCODER_BASE_URL", census::geocoder::GEOCODER_URL),
            timeout,
            max_retries,
            cache_dir,
        })
    }

    pub fn service(&self, service: Service) -> &ServiceSettings {
        match service {
            Service::Bea => &self.bea,
            Service::Bls => &self.bls,
            Service::Census => &self.census,
            Service::Fred => &self.fred,
        }
    }

    pub fn service_mut(&mut self, service: Service) -> &mut ServiceSettings {
        match service {
            Service::Bea => &mut self.bea,
            Service::Bls => &mut self.bls,
            Service::Census => &mut self.census,
            Service::Fred => &mut self.fred,
        }
    }

    /// Client configuration for one service with the shared timeout and retry budget.
    pub fn client_config(&self, service: Service) -> ClientConfig {
        let settings = self.service(service);
        ClientConfig::new(&settings.base_url)
            .with_api_key(settings.api_key.clone())
            .with_timeout(self.timeout)
            .with_max_retries(self.max_retries)
    }

    /// Keyless client configuration for a download endpoint, e.g. [`Self::qcew_url`].
    pub fn download_config(&self, base_url: &str) -> ClientConfig {
        ClientConfig::new(base_url)
            .with_timeout(self.timeout)
            .with_max_retries(self.max_retries)
    }
}

fn parse_number<T: std::str::FromStr>(var: &str, raw: &str) -> Result<T, EcoStatsError> {
    raw.parse::<T>().map_err(|_| {
        EcoStatsError::Config(format!("{} must be a non-negative integer, got '{}'", var, raw))
    })
}
