//! One handle over all four service clients and the keyless download clients.
//!
//! Clients are built up front in [`EcoStats::new`]: BLS, Census and the
//! download clients always (no key or an optional one), BEA and FRED only
//! when a key is configured.
//! Accessors return the held client or `MissingApiKey`, so there is no
//! first-access initialization to race on.

use std::future::Future;

use eco_stats_api::{
    BeaClient, BlsClient, CensusClient, FlatFileClient, FredClient, GeocoderClient, QcewClient,
};
use serde_json::Value;

use crate::cache::ResponseCache;
use crate::config::{EcoStatsConfig, Service};
use crate::error::EcoStatsError;

pub struct EcoStats {
    bea: Option<BeaClient>,
    bls: BlsClient,
    census: CensusClient,
    fred: Option<FredClient>,
    bls_flat_files: FlatFileClient,
    qcew: QcewClient,
    geocoder: GeocoderClient,
    cache: ResponseCache,
}

impl EcoStats {
    pub fn new(config: &EcoStatsConfig) -> Result<Self, EcoStatsError> {
        let bea = match config.bea.api_key {
            Some(_) => Some(BeaClient::with_config(config.client_config(Service::Bea))?),
            None => None,
        };
        let fred = match config.fred.api_key {
            Some(_) => Some(FredClient::with_config(config.client_config(Service::Fred))?),
            None => None,
        };
        let bls = BlsClient::with_config(config.client_config(Service::Bls))?;
        let census = CensusClient::with_config(config.client_config(Service::Census))?;
        let bls_flat_files =
            FlatFileClient::with_config(config.download_config(&config.bls_flat_file_url))?;
        let qcew = QcewClient::with_config(config.download_config(&config.qcew_url))?;
        let geocoder = GeocoderClient::with_config(config.download_config(&config.geocoder_url))?;

        let stats = Self {
            bea,
            bls,
            census,
            fred,
            bls_flat_files,
            qcew,
            geocoder,
            cache: ResponseCache::new(&config.cache_dir),
        };
        for (service, available) in stats.available() {
            if !available {
                tracing::debug!("{} client disabled: {} is not set", service, service.key_var());
            }
        }
        Ok(stats)
    }

    pub fn bea(&self) -> Result<&BeaClient, EcoStatsError> {
        self.bea.as_ref().ok_or_else(|| missing_key(Service::Bea))
    }

    pub fn bls(&self) -> Result<&BlsClient, EcoStatsError> {
        Ok(&self.bls)
    }

    pub fn census(&self) -> Result<&CensusClient, EcoStatsError> {
        Ok(&self.census)
    }

    pub fn fred(&self) -> Result<&FredClient, EcoStatsError> {
        self.fred.as_ref().ok_or_else(|| missing_key(Service::Fred))
    }

    /// BLS flat files: lookup tables, series lists, bulk data.
    pub fn bls_flat_files(&self) -> &FlatFileClient {
        &self.bls_flat_files
    }

    pub fn qcew(&self) -> &QcewClient {
        &self.qcew
    }

    pub fn geocoder(&self) -> &GeocoderClient {
        &self.geocoder
    }

    /// Whether each service has a client, in [`Service::ALL`] order.
    pub fn available(&self) -> Vec<(Service, bool)> {
        Service::ALL
            .iter()
            .map(|&s| {
                let present = match s {
                    Service::Bea => self.bea.is_some(),
                    Service::Fred => self.fred.is_some(),
                    Service::Bls | Service::Census => true,
                };
                (s, present)
            })
            .collect()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Returns the cached body for `key`, or runs `fetch` and caches its result.
    pub async fn cached<F, Fut>(&self, key: &str, fetch: F) -> Result<Value, EcoStatsError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, eco_stats_api::Error>>,
    {
        if let Some(hit) = self.cache.load(key)? {
            tracing::debug!("Cache hit for {}", key);
            return Ok(hit);
        }
        let value = fetch().await?;
        self.cache.store(key, &value)?;
        Ok(value)
    }

    /// Closes every held client. Returns how many were released by this
    /// call, so a second call returns 0.
    pub fn close(&self) -> usize {
        let released = [
            self.bea.as_ref().map(BeaClient::close),
            Some(self.bls.close()),
            Some(self.census.close()),
            self.fred.as_ref().map(FredClient::close),
            Some(self.bls_flat_files.close()),
            Some(self.qcew.close()),
            Some(self.geocoder.close()),
        ]
        .into_iter()
        .flatten()
        .filter(|&r| r)
        .count();
        if released > 0 {
            tracing::debug!("Closed {} client(s)", released);
        }
        released
    }

    /// True once every held client is closed.
    pub fn is_closed(&self) -> bool {
        self.bea.as_ref().map_or(true, BeaClient::is_closed)
            && self.bls.is_closed()
            && self.census.is_closed()
            && self.fred.as_ref().map_or(true, FredClient::is_closed)
            && self.bls_flat_files.is_closed()
            && self.qcew.is_closed()
            && self.geocoder.is_closed()
    }
}

impl Drop for EcoStats {
    fn drop(&mut self) {
        self.close();
    }
}

fn missing_key(service: Service) -> EcoStatsError {
    eco_stats_api::Error::MissingApiKey {
        service: service.name(),
    }
    .into()
}
