//! Bureau of Labor Statistics: API client, flat-file and QCEW downloads,
//! program registry, series ID layouts.

pub mod client;
pub mod flat_files;
pub mod programs;
pub mod qcew;
pub mod series_id;

pub use client::BlsClient;
pub use flat_files::FlatFileClient;
pub use qcew::{QcewClient, SliceType};
pub use programs::{get_program, list_programs, Program, SeriesField, PROGRAMS};
pub use series_id::{build_series_id, parse_series_id, ParsedSeriesId};
