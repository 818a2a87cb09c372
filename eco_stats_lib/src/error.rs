//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding configuration, cache, serialization and argument failures.
#[derive(Debug)]
pub enum EcoStatsError {
    /// An error from one of the API clients.
    Api(eco_stats_api::Error),
    /// Environment configuration could not be loaded.
    Config(String),
    /// Reading or writing the disk cache failed.
    Cache(std::io::Error),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// A caller-supplied argument was rejected.
    InvalidArgument(String),
}

impl EcoStatsError {
    /// True when the failure was detected before any request was sent.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Api(e) => e.is_validation(),
            Self::InvalidArgument(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for EcoStatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Cache(e) => write!(f, "Cache error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for EcoStatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Cache(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<eco_stats_api::Error> for EcoStatsError {
    fn from(e: eco_stats_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<std::io::Error> for EcoStatsError {
    fn from(e: std::io::Error) -> Self {
        Self::Cache(e)
    }
}

impl From<serde_json::Error> for EcoStatsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
