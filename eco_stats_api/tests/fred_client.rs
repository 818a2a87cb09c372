use std::time::Duration;

use eco_stats_api::{ClientConfig, Error, FredClient, ObservationsQuery, SeriesSearchQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client(server: &MockServer, key: Option<&str>, max_retries: u32) -> FredClient {
    let config = ClientConfig::new(&server.uri())
        .with_api_key(key.map(str::to_string))
        .with_max_retries(max_retries)
        .with_retry_delays(Duration::ZERO, Duration::ZERO);
    FredClient::with_config(config).unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}

#[tokio::test]
async fn observations_send_documented_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series/observations"))
        .and(query_param("series_id", "GDP"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("file_type", "json"))
        .and(query_param("units", "lin"))
        .and(query_param("aggregation_method", "avg"))
        .and(query_param("output_type", "1"))
        .and(query_param("sort_order", "asc"))
        .and(query_param("observation_start", "2023-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("fred_observations.json")))
        .expect(1)
        .mount(&server)
        .await;

    let fred = client(&server, Some("test-key"), 0);
    let query = ObservationsQuery::new("GDP").with_observation_start("2023-01-01");
    let body = fred.get_series_observations(&query).await.unwrap();
    assert_eq!(body["count"], 4);
    assert_eq!(body["observations"][0]["value"], "26813.601");
}

#[tokio::test]
async fn typed_observations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series/observations"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("fred_observations.json")))
        .mount(&server)
        .await;

    let fred = client(&server, Some("test-key"), 0);
    let resp = fred
        .get_observations_typed(&ObservationsQuery::new("GDP"))
        .await
        .unwrap();
    let values: Vec<Option<f64>> = resp.observations.iter().map(|o| o.numeric_value()).collect();
    assert_eq!(values, vec![Some(26813.601), Some(27063.012), None, Some(27956.998)]);
}

#[tokio::test]
async fn inflation_uses_percent_change_from_year_ago() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series/observations"))
        .and(query_param("series_id", "CPIAUCSL"))
        .and(query_param("units", "pc1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("fred_observations.json")))
        .expect(1)
        .mount(&server)
        .await;

    let fred = client(&server, Some("test-key"), 0);
    fred.get_inflation_rate(Some("2023-01-01"), None).await.unwrap();
}

#[tokio::test]
async fn missing_key_makes_no_request() {
    let server = MockServer::start().await;
    let fred = client(&server, None, 3);
    let err = fred.get_gdp(None, None).await.unwrap_err();
    assert!(matches!(err, Error::MissingApiKey { service: "FRED" }));
    assert!(err.is_validation());
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn invalid_arguments_make_no_request() {
    let server = MockServer::start().await;
    let fred = client(&server, Some("test-key"), 3);

    let cases = vec![
        ObservationsQuery::new(""),
        ObservationsQuery::new("GDP").with_observation_start("2023/01/01"),
        ObservationsQuery::new("GDP").with_range(Some("2024-01-01"), Some("2023-01-01")),
        ObservationsQuery::new("GDP").with_units("percent"),
        ObservationsQuery::new("GDP").with_frequency("hourly"),
        ObservationsQuery::new("GDP").with_limit(0),
        ObservationsQuery::new("GDP").with_output_type(5),
    ];
    for query in cases {
        let err = fred.get_series_observations(&query).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{:?}", query);
    }
    let err = fred
        .search_series(&SeriesSearchQuery::new("gdp").with_limit(1001))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&server)
        .await;

    let fred = client(&server, Some("test-key"), 3);
    match fred.get_series("NOPE").await.unwrap_err() {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not Found");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"seriess":[{"id":"UNRATE"}]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let fred = client(&server, Some("test-key"), 3);
    let body = fred.get_series("UNRATE").await.unwrap();
    assert_eq!(body["seriess"][0]["id"], "UNRATE");
}

#[tokio::test]
async fn persistent_server_error_becomes_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let fred = client(&server, Some("test-key"), 2);
    match fred.get_series("GDP").await.unwrap_err() {
        Error::Network { attempts, message } => {
            assert_eq!(attempts, 3);
            assert!(message.contains("500"));
        }
        other => panic!("expected Network, got {:?}", other),
    }
}

#[tokio::test]
async fn in_body_error_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"error_code":400,"error_message":"Bad Request. The value for variable api_key is not registered."}"#,
        ))
        .mount(&server)
        .await;

    let fred = client(&server, Some("bad-key"), 0);
    let err = fred.get_series("GDP").await.unwrap_err();
    assert!(matches!(err, Error::Service { service: "FRED", .. }));
}

#[tokio::test]
async fn malformed_json_is_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&server)
        .await;

    let fred = client(&server, Some("test-key"), 0);
    let err = fred.get_series("GDP").await.unwrap_err();
    assert!(matches!(err, Error::ResponseFormat(_)));
}

#[tokio::test]
async fn search_and_categories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/series/search"))
        .and(query_param("search_text", "consumer price"))
        .and(query_param("search_type", "full_text"))
        .and(query_param("limit", "25"))
        .and(query_param("order_by", "search_rank"))
        .and(query_param("sort_order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"seriess":[]}"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/category/series"))
        .and(query_param("category_id", "32991"))
        .and(query_param("limit", "1000"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"seriess":[]}"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/category"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"categories":[{"id":0}]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let fred = client(&server, Some("test-key"), 0);
    fred.search_series(&SeriesSearchQuery::new("consumer price").with_limit(25))
        .await
        .unwrap();
    fred.get_category_series(32991, None, None).await.unwrap();
    let root = fred.get_category(None).await.unwrap();
    assert_eq!(root["categories"][0]["id"], 0);

    let requests = server.received_requests().await.unwrap();
    let category = requests.iter().find(|r| r.url.path() == "/category").unwrap();
    assert!(!category.url.query().unwrap_or("").contains("category_id"));
}

#[tokio::test]
async fn closed_client_refuses_requests() {
    let server = MockServer::start().await;
    let fred = client(&server, Some("test-key"), 0);
    assert!(fred.close());
    assert!(!fred.close());
    assert!(fred.is_closed());
    let err = fred.get_series("GDP").await.unwrap_err();
    assert!(matches!(err, Error::Closed { service: "FRED" }));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn unreachable_server_error_hides_key() {
    let config = ClientConfig::new("http://127.0.0.1:1/fred")
        .with_api_key(Some("SUPERSECRETKEY".to_string()))
        .with_max_retries(0);
    let fred = FredClient::with_config(config).unwrap();
    let err = fred.get_series("GDP").await.unwrap_err();
    assert!(matches!(err, Error::Network { attempts: 1, .. }));
    assert!(!err.to_string().contains("SUPERSECRETKEY"), "{}", err);
}
