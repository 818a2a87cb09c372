use eco_stats_api::query::bea::validate_year_spec;
use eco_stats_api::query::bls::{V1_LIMITS, V2_LIMITS};
use eco_stats_api::{
    BeaDataQuery, BlsSeriesQuery, CensusQuery, GeocodeQuery, ObservationsQuery, Query, ReturnType,
    SeriesSearchQuery, SortDirection,
};
use serde_json::json;

fn pairs(query: &impl Query) -> Vec<(String, String)> {
    query.to_query_pairs()
}

fn pair(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

#[test]
fn observations_defaults() {
    let query = ObservationsQuery::new("UNRATE");
    assert!(query.validate().is_ok());
    assert_eq!(
        pairs(&query),
        vec![
            pair("series_id", "UNRATE"),
            pair("units", "lin"),
            pair("aggregation_method", "avg"),
            pair("output_type", "1"),
            pair("sort_order", "asc"),
        ]
    );
}

#[test]
fn observations_optional_params() {
    let query = ObservationsQuery::new("GDP")
        .with_range(Some("2020-01-01"), Some("2023-12-31"))
        .with_frequency("a")
        .with_aggregation_method("eop")
        .with_vintage_dates("2024-01-01,2024-02-01")
        .with_limit(10)
        .with_offset(5)
        .with_sort_order(SortDirection::Desc);
    assert!(query.validate().is_ok());
    let p = pairs(&query);
    assert!(p.contains(&pair("observation_start", "2020-01-01")));
    assert!(p.contains(&pair("observation_end", "2023-12-31")));
    assert!(p.contains(&pair("frequency", "a")));
    assert!(p.contains(&pair("aggregation_method", "eop")));
    assert!(p.contains(&pair("vintage_dates", "2024-01-01,2024-02-01")));
    assert!(p.contains(&pair("limit", "10")));
    assert!(p.contains(&pair("offset", "5")));
    assert!(p.contains(&pair("sort_order", "desc")));
}

#[test]
fn observations_rejects_bad_vintage() {
    let query = ObservationsQuery::new("GDP").with_vintage_dates("2024-01-01,yesterday");
    assert!(query.validate().is_err());
}

#[test]
fn search_defaults() {
    let query = SeriesSearchQuery::new("unemployment");
    assert!(query.validate().is_ok());
    let p = pairs(&query);
    assert!(p.contains(&pair("search_type", "full_text")));
    assert!(p.contains(&pair("limit", "1000")));
    assert!(p.contains(&pair("sort_order", "desc")));
    assert!(SeriesSearchQuery::new("x").with_search_type("title").validate().is_err());
    assert!(SeriesSearchQuery::new(" ").validate().is_err());
}

#[test]
fn bea_pairs_in_order() {
    let query = BeaDataQuery::new("NIPA")
        .with_table_name("T20305")
        .with_frequency("Q")
        .with_year("2023")
        .with_param("ShowMillions", "N");
    assert_eq!(
        pairs(&query),
        vec![
            pair("datasetname", "NIPA"),
            pair("TableName", "T20305"),
            pair("Frequency", "Q"),
            pair("Year", "2023"),
            pair("ShowMillions", "N"),
        ]
    );
}

#[test]
fn bea_year_specs() {
    for ok in ["X", "all", "LAST5", "2020", "2020,2021, 2022"] {
        assert!(validate_year_spec(ok).is_ok(), "{}", ok);
    }
    for bad in ["LAST", "LASTfive", "20", "2020,"] {
        assert!(validate_year_spec(bad).is_err(), "{}", bad);
    }
}

#[test]
fn bls_payload_only_carries_set_fields() {
    let query = BlsSeriesQuery::new(["CUUR0000SA0", "SUUR0000SA0"])
        .with_years(Some("2022"), Some("2024"))
        .with_catalog(true)
        .with_annual_average(true)
        .with_aspects(true);
    assert_eq!(
        query.to_payload(None),
        json!({
            "seriesid": ["CUUR0000SA0", "SUUR0000SA0"],
            "startyear": "2022",
            "endyear": "2024",
            "catalog": true,
            "annualaverage": true,
            "aspects": true
        })
    );
    assert_eq!(
        pairs(&query),
        vec![
            pair("startyear", "2022"),
            pair("endyear", "2024"),
            pair("catalog", "true"),
            pair("annualaverage", "true"),
            pair("aspects", "true"),
        ]
    );
}

#[test]
fn bls_validation() {
    assert!(BlsSeriesQuery::new(["LNS14000000"]).validate().is_ok());
    assert!(BlsSeriesQuery::new(["LNS-14000000"]).validate().is_err());
    assert!(BlsSeriesQuery::new([""]).validate().is_err());
    assert!(BlsSeriesQuery::new(["A"]).with_years(Some("2024"), Some("2023")).validate().is_err());

    let ten = BlsSeriesQuery::new(["A"]).with_years(Some("2011"), Some("2020"));
    assert!(ten.check_limits(V1_LIMITS).is_ok());
    let twenty = BlsSeriesQuery::new(["A"]).with_years(Some("2001"), Some("2020"));
    assert!(twenty.check_limits(V1_LIMITS).is_err());
    assert!(twenty.check_limits(V2_LIMITS).is_ok());

    let fifty = BlsSeriesQuery::new((0..50).map(|i| format!("S{}", i)));
    assert!(fifty.check_limits(V2_LIMITS).is_ok());
    assert!(fifty.check_limits(V1_LIMITS).is_err());
}

#[test]
fn census_pairs() {
    let query = CensusQuery::new("acs5", ["NAME", " B01001_001E"], "tract:*")
        .with_geo_in("state:06 county:037")
        .with_predicate("ucgid", "0400000US06");
    assert!(query.validate().is_ok());
    assert_eq!(
        pairs(&query),
        vec![
            pair("get", "NAME,B01001_001E"),
            pair("for", "tract:*"),
            pair("in", "state:06 county:037"),
            pair("ucgid", "0400000US06"),
        ]
    );
}

#[test]
fn census_geography_with_spaces_in_level() {
    let query = CensusQuery::new(
        "acs5",
        ["NAME"],
        "metropolitan statistical area/micropolitan statistical area:*",
    );
    assert!(query.validate().is_ok());
}

#[test]
fn bls_open_ended_span_counts_to_current_year() {
    let open = BlsSeriesQuery::new(["LNS14000000"]).with_years(Some("2010"), None);
    assert!(open.check_limits_as_of(V1_LIMITS, 2024).is_err());
    assert!(open.check_limits_as_of(V2_LIMITS, 2024).is_ok());
    assert!(open.check_limits_as_of(V2_LIMITS, 2030).is_err());

    let recent = BlsSeriesQuery::new(["LNS14000000"]).with_years(Some("2020"), None);
    assert!(recent.check_limits_as_of(V1_LIMITS, 2024).is_ok());
    assert!(BlsSeriesQuery::new(["LNS14000000"])
        .with_years(Some("2001"), None)
        .check_limits(V1_LIMITS)
        .is_err());
}

#[test]
fn geocode_one_line_address_wins_over_parts() {
    let mut query = GeocodeQuery::one_line(" 1600 Pennsylvania Ave NW, Washington, DC ");
    query.street = Some("ignored".to_string());
    assert!(query.validate().is_ok());
    assert_eq!(query.endpoint(), "locations/onelineaddress");
    assert_eq!(
        query.to_query_pairs(),
        vec![
            ("address".to_string(), "1600 Pennsylvania Ave NW, Washington, DC".to_string()),
            ("benchmark".to_string(), "Public_AR_Current".to_string()),
            ("format".to_string(), "json".to_string()),
        ]
    );
}

#[test]
fn geocode_parts_with_geographies() {
    let query = GeocodeQuery::parts("4600 Silver Hill Rd", Some("Washington"), Some("DC"), None)
        .with_return_type(ReturnType::Geographies)
        .with_benchmark("Public_AR_Census2020")
        .with_vintage("Census2020_Census2020");
    assert!(query.validate().is_ok());
    assert_eq!(query.endpoint(), "geographies/address");
    assert_eq!(
        query.to_query_pairs(),
        vec![
            ("street".to_string(), "4600 Silver Hill Rd".to_string()),
            ("city".to_string(), "Washington".to_string()),
            ("state".to_string(), "DC".to_string()),
            ("benchmark".to_string(), "Public_AR_Census2020".to_string()),
            ("vintage".to_string(), "Census2020_Census2020".to_string()),
            ("format".to_string(), "json".to_string()),
        ]
    );
}

#[test]
fn geocode_needs_a_locatable_address() {
    assert!(GeocodeQuery::default().validate().unwrap_err().is_validation());
    assert!(GeocodeQuery::one_line("   ").validate().is_err());
    assert!(GeocodeQuery::parts("1 Main St", None, None, None).validate().is_err());
    assert!(GeocodeQuery::parts("1 Main St", None, None, Some("62701")).validate().is_ok());
    assert!(GeocodeQuery::one_line("1 Main St, Springfield, IL")
        .with_benchmark("")
        .validate()
        .is_err());
}
