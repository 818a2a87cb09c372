//! Federal Reserve Economic Data (FRED).

pub mod client;
pub mod types;

pub use client::FredClient;
pub use types::{Observation, ObservationsResponse};
