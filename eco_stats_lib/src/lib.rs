//! Library layer for eco-stats: configuration, unified facade, disk cache,
//! and date/series helpers.
//!
//! Wraps the `eco_stats_api` clients behind [`EcoStats`] and adds the
//! utilities callers need to turn raw responses into numbers.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod facade;
pub mod series;
pub mod validation;

pub use eco_stats_api;
pub use eco_stats_api::{
    AddressMatch, BeaClient, BeaDataQuery, BlsClient, BlsSeriesQuery, CensusClient, CensusQuery,
    FlatFileClient, FredClient, GeocodeQuery, GeocoderClient, ObservationsQuery, QcewClient, Row,
    SeriesSearchQuery, SliceType,
};

pub use analysis::{calculate_moving_average, calculate_percent_change, calculate_percent_change_over};
pub use cache::ResponseCache;
pub use config::{EcoStatsConfig, Service, ServiceSettings};
pub use error::EcoStatsError;
pub use facade::EcoStats;
pub use series::{extract_series, filter_by_date_range, observation_values, Observation, Source};
pub use validation::{format_date, parse_date, validate_date};
