//! Census Bureau: Data API client, dataset catalog and geocoder.

pub mod catalog;
pub mod client;
pub mod geocoder;

pub use catalog::{Dataset, DATASETS};
pub use client::CensusClient;
pub use geocoder::{AddressMatch, GeocoderClient};
