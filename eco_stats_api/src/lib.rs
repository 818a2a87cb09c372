pub mod bea;
pub mod bls;
pub mod census;
mod client;
mod config;
mod errors;
pub mod fred;
pub mod query;
mod tabular;
mod transport;
pub use self::bea::BeaClient;
pub use self::bls::{BlsClient, FlatFileClient, QcewClient, SliceType};
pub use self::census::{AddressMatch, CensusClient, GeocoderClient};
pub use self::client::{AuthStyle, Request, RequestExecutor};
pub use self::config::{
    ClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BASE_DELAY, DEFAULT_RETRY_MAX_DELAY,
    DEFAULT_TIMEOUT,
};
pub use self::errors::Error;
pub use self::fred::FredClient;
pub use self::query::{
    BeaDataQuery, BlsSeriesQuery, CensusQuery, GeocodeQuery, ObservationsQuery, Query, ReturnType,
    SeriesSearchQuery, SortDirection,
};
pub use self::tabular::Row;
pub use self::transport::{HttpRequest, HttpTransport, Method, RawResponse, Transport, TransportError};
