mod common;
pub use self::common::{
    require_non_empty, validate_code, validate_iso_date, validate_range, validate_year, Query,
    SortDirection,
};

pub mod bea;
pub use self::bea::BeaDataQuery;

pub mod bls;
pub use self::bls::BlsSeriesQuery;

pub mod census;
pub use self::census::{CensusQuery, GeocodeQuery, ReturnType};

pub mod fred;
pub use self::fred::{ObservationsQuery, SeriesSearchQuery};
