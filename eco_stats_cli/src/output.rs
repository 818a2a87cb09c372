use eco_stats_lib::{EcoStats, EcoStatsConfig};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled, Serialize, Debug, PartialEq)]
pub struct ServiceRow {
    #[tabled(rename = "Service")]
    #[serde(rename = "Service")]
    service: String,
    #[tabled(rename = "Available")]
    #[serde(rename = "Available")]
    available: bool,
    #[tabled(rename = "API Key")]
    #[serde(rename = "API Key")]
    api_key: String,
    #[tabled(rename = "Base URL")]
    #[serde(rename = "Base URL")]
    base_url: String,
}

pub fn build_service_rows(stats: &EcoStats, config: &EcoStatsConfig) -> Vec<ServiceRow> {
    stats
        .available()
        .into_iter()
        .map(|(service, available)| {
            let settings = config.service(service);
            let api_key = match (&settings.api_key, service.requires_key()) {
                (Some(_), _) => "set",
                (None, true) => "missing",
                (None, false) => "optional",
            };
            ServiceRow {
                service: service.to_string(),
                available,
                api_key: api_key.to_string(),
                base_url: settings.base_url.clone(),
            }
        })
        .collect()
}

// -- Table output --

pub fn print_services_table(rows: &[ServiceRow]) {
    println!("{}", Table::new(rows));
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
