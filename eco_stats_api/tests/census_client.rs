use std::time::Duration;

use eco_stats_api::{CensusClient, CensusQuery, ClientConfig, Error};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client(server: &MockServer, key: Option<&str>) -> CensusClient {
    let config = ClientConfig::new(&server.uri())
        .with_api_key(key.map(str::to_string))
        .with_max_retries(0)
        .with_retry_delays(Duration::ZERO, Duration::ZERO);
    CensusClient::with_config(config).unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}

#[tokio::test]
async fn population_uses_default_acs_vintage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2023/acs/acs5"))
        .and(query_param("get", "NAME,B01001_001E"))
        .and(query_param("for", "state:*"))
        .and(query_param("key", "census-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("census_acs.json")))
        .expect(1)
        .mount(&server)
        .await;

    let census = client(&server, Some("census-key"));
    let rows = census
        .get_population("state:*", None, None, "acs5")
        .await
        .unwrap();
    assert_eq!(rows[0][1], "B01001_001E");
    assert_eq!(rows[2][0], "California");
}

#[tokio::test]
async fn county_query_with_in_clause_and_year() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2021/acs/acs1"))
        .and(query_param("get", "NAME,B19013_001E"))
        .and(query_param("for", "county:*"))
        .and(query_param("in", "state:06"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("census_acs.json")))
        .expect(1)
        .mount(&server)
        .await;

    let census = client(&server, None);
    census
        .get_median_income("county:*", Some("state:06"), Some("2021"), "acs1")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].url.query().unwrap_or("").contains("key="));
}

#[tokio::test]
async fn timeseries_year_becomes_predicate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timeseries/poverty/saipe"))
        .and(query_param("get", "NAME,SAEPOVRTALL_PT"))
        .and(query_param("time", "2022"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([["NAME", "SAEPOVRTALL_PT", "time", "state"]])))
        .expect(1)
        .mount(&server)
        .await;

    let census = client(&server, None);
    census
        .get_poverty(None, "state:*", None, Some("2022"))
        .await
        .unwrap();
}

#[tokio::test]
async fn literal_dataset_path_and_predicates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2022/cbp"))
        .and(query_param("NAICS2017", "54"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([["NAME"]])))
        .expect(1)
        .mount(&server)
        .await;

    let census = client(&server, None);
    let query = CensusQuery::new("cbp", ["NAME", "ESTAB"], "us:1").with_predicate("NAICS2017", "54");
    census.get_data(&query).await.unwrap();
}

#[tokio::test]
async fn discovery_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2023/acs/acs5/variables.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"variables": {"B01001_001E": {"label": "Estimate!!Total:"}}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/timeseries/bds/geography.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fips": [{"name": "us"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let census = client(&server, None);
    let vars = census.get_variables("acs5", None).await.unwrap();
    assert_eq!(vars["variables"]["B01001_001E"]["label"], "Estimate!!Total:");
    let geos = census.get_geographies("bds", None).await.unwrap();
    assert_eq!(geos["fips"][0]["name"], "us");

    let datasets = census.list_datasets();
    assert!(datasets.iter().any(|d| d.key == "pep" && d.path == "pep/population"));
}

#[tokio::test]
async fn malformed_arguments_make_no_request() {
    let server = MockServer::start().await;
    let census = client(&server, None);

    let empty: [&str; 0] = [];
    let cases = vec![
        CensusQuery::new("acs5", empty, "state:*"),
        CensusQuery::new("acs5", ["NAME"], "state"),
        CensusQuery::new("acs5", ["NAME"], "state:"),
        CensusQuery::new("acs5", ["NAME"], "county:*").with_geo_in("06"),
        CensusQuery::new("acs5", ["NAME"], "state:*").with_year("23"),
        CensusQuery::new("", ["NAME"], "state:*"),
    ];
    for query in cases {
        let err = census.get_data(&query).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{:?}", query);
    }
    let err = census
        .get_acs(&["NAME"], "state:*", None, None, "acs3")
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn error_object_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2023/acs/acs5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "error: unknown variable 'XYZ'"})))
        .mount(&server)
        .await;

    let census = client(&server, None);
    let err = census
        .get_acs(&["XYZ"], "state:*", None, None, "acs5")
        .await
        .unwrap_err();
    match err {
        Error::Service { service, message } => {
            assert_eq!(service, "Census");
            assert!(message.contains("unknown variable"));
        }
        other => panic!("expected Service, got {:?}", other),
    }
}
