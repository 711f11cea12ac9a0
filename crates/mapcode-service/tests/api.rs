//! End-to-end tests driving the router in-process.

use axum_test::TestServer;
use http::StatusCode;
use serde_json::Value;

use mapcode_service::build_router;
use mapcode_service_shared::test_utils::{test_state, TEST_API_KEY, TEST_VERSION};

const AMSTERDAM: &str = "52.376514,4.908542";

fn server() -> TestServer {
    TestServer::new(build_router(test_state())).expect("router must start")
}

#[tokio::test]
async fn help_page_lists_the_endpoints() {
    let server = server();
    let response = server.get("/mapcode").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("MAPCODE REST SERVICES"));
    assert!(body.contains(TEST_VERSION));
}

#[tokio::test]
async fn status_returns_ok_with_empty_body() {
    let server = server();
    let response = server.get("/mapcode/status").await;
    response.assert_status_ok();
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn version_is_reported_as_json_by_default() {
    let server = server();
    let response = server.get("/mapcode/version").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["version"], TEST_VERSION);
}

#[tokio::test]
async fn version_honors_accept_xml() {
    let server = server();
    let response = server
        .get("/mapcode/version")
        .add_header("accept", "application/xml")
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/xml");
    assert!(response.text().contains(TEST_VERSION));
}

#[tokio::test]
async fn forced_format_trees_override_accept() {
    let server = server();

    let xml = server
        .get("/mapcode/xml/version")
        .add_header("accept", "application/json")
        .await;
    xml.assert_status_ok();
    assert_eq!(xml.header("content-type"), "application/xml");

    let json = server
        .get("/mapcode/json/version")
        .add_header("accept", "application/xml")
        .await;
    json.assert_status_ok();
    let body: Value = json.json();
    assert_eq!(body["version"], TEST_VERSION);
}

#[tokio::test]
async fn codes_without_path_parameters_is_forbidden() {
    let server = server();
    let response = server.get("/mapcode/codes").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Missing URL path parameters"));
}

#[tokio::test]
async fn codes_returns_local_and_international() {
    let server = server();
    let response = server.get(&format!("/mapcode/codes/{AMSTERDAM}")).await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["local"]["territory"], "NLD");
    assert!(body["international"]["mapcode"].is_string());
    assert!(body["international"].get("territory").is_none());

    let mapcodes = body["mapcodes"].as_array().unwrap();
    assert!(mapcodes.len() >= 2);
    assert_eq!(mapcodes[0]["territory"], "NLD");
    assert!(mapcodes.last().unwrap().get("territory").is_none());
}

#[tokio::test]
async fn codes_local_returns_shortest_code() {
    let server = server();
    let response = server
        .get(&format!("/mapcode/codes/{AMSTERDAM}/local"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["territory"], "NLD");
    // Local codes have the RR.CC shape.
    assert_eq!(body["mapcode"].as_str().unwrap().len(), 5);
}

#[tokio::test]
async fn codes_local_is_not_found_in_overlapping_territories() {
    // This point lies in both Belgian and French coding bounds.
    let server = server();
    let response = server.get("/mapcode/codes/50.5,3.0/local").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("multiple territories"));
}

#[tokio::test]
async fn codes_local_is_not_found_on_open_ocean() {
    let server = server();
    let response = server.get("/mapcode/codes/30.0,-40.0/local").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("international"));
}

#[tokio::test]
async fn codes_international_carries_no_territory() {
    let server = server();
    let response = server.get("/mapcode/codes/30.0,-40.0/international").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["mapcode"].is_string());
    assert!(body.get("territory").is_none());
}

#[tokio::test]
async fn codes_with_includes_and_alphabet() {
    let server = server();
    let response = server
        .get(&format!("/mapcode/codes/{AMSTERDAM}/local"))
        .add_query_param("include", "offset,territory,alphabet,rectangle")
        .add_query_param("alphabet", "greek")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["offsetMeters"].as_f64().is_some());
    assert_eq!(body["territory"], "NLD");
    assert!(body["mapcodeInAlphabet"].is_string());
    assert!(body["territoryInAlphabet"].is_string());
    assert!(body["rectangle"]["southWest"]["latDeg"].as_f64().is_some());
}

#[tokio::test]
async fn codes_rejects_invalid_parameters() {
    let server = server();

    let bad_pair = server.get("/mapcode/codes/52.4").await;
    assert_eq!(bad_pair.status_code(), StatusCode::BAD_REQUEST);

    let bad_lat = server.get("/mapcode/codes/95.0,4.9").await;
    assert_eq!(bad_lat.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = bad_lat.json();
    assert_eq!(body["param"], "lat");

    let bad_precision = server
        .get(&format!("/mapcode/codes/{AMSTERDAM}"))
        .add_query_param("precision", "9")
        .await;
    assert_eq!(bad_precision.status_code(), StatusCode::BAD_REQUEST);

    let bad_type = server
        .get(&format!("/mapcode/codes/{AMSTERDAM}/everything"))
        .await;
    assert_eq!(bad_type.status_code(), StatusCode::BAD_REQUEST);

    let bad_territory = server
        .get(&format!("/mapcode/codes/{AMSTERDAM}"))
        .add_query_param("territory", "XYZZY")
        .await;
    assert_eq!(bad_territory.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = bad_territory.json();
    assert_eq!(body["param"], "territory");
}

#[tokio::test]
async fn codes_rejects_context_parameter() {
    let server = server();
    let response = server
        .get(&format!("/mapcode/codes/{AMSTERDAM}"))
        .add_query_param("context", "NLD")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["param"], "context");
}

#[tokio::test]
async fn longitude_is_wrapped_not_rejected() {
    let server = server();
    let response = server.get("/mapcode/codes/52.4,364.9").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn coords_without_path_parameters_is_forbidden() {
    let server = server();
    let response = server.get("/mapcode/coords").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn coords_round_trips_an_international_code() {
    let server = server();
    let encoded: Value = server
        .get(&format!("/mapcode/codes/{AMSTERDAM}/international"))
        .await
        .json();
    let code = encoded["mapcode"].as_str().unwrap().to_string();

    let response = server.get(&format!("/mapcode/coords/{code}")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!((body["latDeg"].as_f64().unwrap() - 52.376514).abs() < 0.05);
    assert!((body["lonDeg"].as_f64().unwrap() - 4.908542).abs() < 0.05);
}

#[tokio::test]
async fn coords_uses_the_context_parameter() {
    let server = server();

    // A local shape without context cannot be resolved.
    let without = server.get("/mapcode/coords/XQ.PZ").await;
    assert_eq!(without.status_code(), StatusCode::NOT_FOUND);

    let with = server
        .get("/mapcode/coords/XQ.PZ")
        .add_query_param("context", "NLD")
        .await;
    with.assert_status_ok();
}

#[tokio::test]
async fn coords_rejects_territory_parameter() {
    let server = server();
    let response = server
        .get("/mapcode/coords/XQ.PZ")
        .add_query_param("territory", "NLD")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["param"], "territory");
}

#[tokio::test]
async fn coords_rejects_malformed_mapcode() {
    let server = server();
    let response = server.get("/mapcode/coords/XA.PZ").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["param"], "mapcode");
}

#[tokio::test]
async fn coords_include_rectangle() {
    let server = server();
    let response = server
        .get("/mapcode/coords/XQ.PZ")
        .add_query_param("context", "NLD")
        .add_query_param("include", "rectangle")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let rect = &body["rectangle"];
    assert!(rect["southWest"]["latDeg"].as_f64().unwrap() <= body["latDeg"].as_f64().unwrap());
    assert!(rect["northEast"]["latDeg"].as_f64().unwrap() >= body["latDeg"].as_f64().unwrap());
}

#[tokio::test]
async fn territories_catalog_pages() {
    let server = server();

    let all: Value = server.get("/mapcode/territories").await.json();
    let total = all["total"].as_u64().unwrap();
    assert_eq!(
        all["territories"].as_array().unwrap().len() as u64,
        total
    );

    let page: Value = server
        .get("/mapcode/territories")
        .add_query_param("offset", "1")
        .add_query_param("count", "2")
        .await
        .json();
    assert_eq!(page["total"].as_u64().unwrap(), total);
    assert_eq!(page["territories"].as_array().unwrap().len(), 2);

    // Negative offset counts from the end of the catalog.
    let tail: Value = server
        .get("/mapcode/territories")
        .add_query_param("offset", "-3")
        .await
        .json();
    assert_eq!(tail["territories"].as_array().unwrap().len(), 3);

    let bad = server
        .get("/mapcode/territories")
        .add_query_param("count", "-1")
        .await;
    assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_territory_lookup() {
    let server = server();
    let response = server.get("/mapcode/territories/NLD").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "NLD");
    assert!(body["fullName"].is_string());

    // Subdivision lookup disambiguated by context.
    let ca: Value = server
        .get("/mapcode/territories/CA")
        .add_query_param("context", "USA")
        .await
        .json();
    assert_eq!(ca["name"], "US-CA");

    let missing = server.get("/mapcode/territories/XYZZY").await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn alphabets_catalog_and_lookup() {
    let server = server();

    let all: Value = server.get("/mapcode/alphabets").await.json();
    let total = all["total"].as_u64().unwrap();
    assert!(total >= 2);
    assert_eq!(all["alphabets"].as_array().unwrap().len() as u64, total);

    let greek: Value = server.get("/mapcode/alphabets/greek").await.json();
    assert_eq!(greek["name"], "GREEK");
    assert!(greek["number"].is_u64());

    let missing = server.get("/mapcode/alphabets/klingon").await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_key_conversion_checks_the_key_first() {
    let server = server();

    let rejected = server
        .get("/mapcode/wrong-key/from/not-a-lat/4.9/0")
        .await;
    assert_eq!(rejected.status_code(), StatusCode::FORBIDDEN);
    let body: Value = rejected.json();
    assert_eq!(body["param"], "apiKey");

    let accepted = server
        .get(&format!(
            "/mapcode/{TEST_API_KEY}/from/52.376514/4.908542/0"
        ))
        .await;
    accepted.assert_status_ok();
    let body: Value = accepted.json();
    assert_eq!(body["territory"], "NLD");

    let bad_lat = server
        .get(&format!("/mapcode/{TEST_API_KEY}/from/95.0/4.9/0"))
        .await;
    assert_eq!(bad_lat.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn system_metrics_count_requests() {
    let server = server();

    server.get(&format!("/mapcode/codes/{AMSTERDAM}")).await;
    server.get("/mapcode/codes/95.0,4.9").await;
    server
        .get("/mapcode/coords/XQ.PZ")
        .add_query_param("context", "NLD")
        .await;

    let body: Value = server.get("/mapcode/metrics").await.json();
    assert_eq!(body["totalLatLonToMapcodeRequests"], 2);
    assert_eq!(body["validLatLonToMapcodeRequests"], 1);
    assert_eq!(body["totalMapcodeToLatLonRequests"], 1);
    assert_eq!(body["validMapcodeToLatLonRequests"], 1);
}

#[tokio::test]
async fn problem_responses_use_problem_json() {
    let server = server();
    let response = server.get("/mapcode/codes/95.0,4.9").await;
    assert_eq!(
        response.header("content-type"),
        "application/problem+json"
    );
    let body: Value = response.json();
    assert_eq!(body["status"], 400);
    assert!(body["type"].as_str().unwrap().contains("invalid-parameter"));
}

#[tokio::test]
async fn unknown_routes_return_not_found() {
    let server = server();
    let response = server.get("/mapcode/nonsense/route").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
